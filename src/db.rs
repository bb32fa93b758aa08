// src/db.rs
//
// Os services conversam com o banco através destes traits. A implementação de
// produção fica nos *_repo (Postgres via sqlx); os testes usam `memory::MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    models::{
        auth::{NewUser, TokenKind, User},
        company::{Company, NewCompany},
        order::{Order, OrderDraft, OrderItem, OrderStatus},
        pagination::PageRequest,
        product::{NewProduct, Product},
        supplier::{NewSupplier, Supplier},
    },
};

pub mod filters;
pub mod company_repo;
pub mod user_repo;
pub mod supplier_repo;
pub mod product_repo;
pub mod order_repo;

#[cfg(test)]
pub mod memory;

pub use company_repo::CompanyRepository;
pub use filters::Specification;
pub use order_repo::OrderRepository;
pub use product_repo::ProductRepository;
pub use supplier_repo::SupplierRepository;
pub use user_repo::UserRepository;

// Campos ordenáveis (nome público -> coluna) e ordenação padrão de cada listagem
pub const SUPPLIER_SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("contactName", "contact_name"),
    ("email", "email"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];
pub const PRODUCT_SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("category", "category"),
    ("price", "price"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];
pub const ORDER_SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("status", "status"),
    ("totalAmount", "total_amount"),
    ("deliveryDate", "delivery_date"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];
pub const DEFAULT_SORT: (&str, &str) = ("createdAt", "created_at");

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Empresa PENDING + usuário administrador, numa única transação.
    async fn register(&self, company: NewCompany, admin: NewUser) -> Result<(Company, User), AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError>;
    async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;
    async fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<User>, AppError>;
    /// Grava um novo token do tipo `kind` e anula o outro tipo.
    async fn issue_token(
        &self,
        user_id: i64,
        kind: TokenKind,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
    /// Marca o e-mail como verificado, anula o token e ativa a empresa (PENDING -> ACTIVE).
    async fn confirm_email(&self, user_id: i64, company_id: i64) -> Result<(), AppError>;
    async fn reset_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn insert(&self, supplier: NewSupplier) -> Result<Supplier, AppError>;
    async fn update(&self, supplier: &Supplier) -> Result<Supplier, AppError>;
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Supplier>, AppError>;
    async fn exists_by_company_uuid_and_name_ignore_case(
        &self,
        company_uuid: Uuid,
        name: &str,
    ) -> Result<bool, AppError>;
    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Supplier>, AppError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;
    async fn update(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Product>, AppError>;
    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError>;
    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Product>, AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Lê fornecedor e produtos, precifica (`OrderDraft::price`) e grava pedido + itens
    /// numa única transação: ou tudo é gravado, ou nada.
    async fn create_with_items(&self, draft: OrderDraft) -> Result<Order, AppError>;
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Order>, AppError>;
    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError>;
    async fn find_items_for_orders(&self, order_ids: &[i64]) -> Result<Vec<OrderItem>, AppError>;
    /// Compare-and-set do status. `from = None` aceita qualquer estado atual.
    /// Devolve `false` se nenhuma linha foi alterada.
    async fn transition_status(
        &self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
    ) -> Result<bool, AppError>;
    async fn find_in_window(
        &self,
        company_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError>;
    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Order>, AppError>;
}

/// SELECT paginado + COUNT sobre uma view, com o mesmo predicado nas duas queries.
pub(crate) async fn fetch_page<T>(
    pool: &sqlx::PgPool,
    view: &'static str,
    spec: &Specification,
    page: &PageRequest,
    sort_fields: &[(&'static str, &'static str)],
) -> Result<Page<T>, AppError>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    let sort = page.resolve_sort(sort_fields, DEFAULT_SORT);

    let mut count_qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT COUNT(*) FROM ");
    count_qb.push(view);
    spec.push_where(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT * FROM ");
    qb.push(view);
    spec.push_where(&mut qb);
    // Desempate pela chave primária para a paginação ser estável
    qb.push(" ORDER BY ")
        .push(sort.column)
        .push(" ")
        .push(sort.direction.as_sql())
        .push(", id ASC LIMIT ");
    qb.push_bind(i64::from(page.size()));
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());

    let rows: Vec<T> = qb.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page::new(rows, page, sort.field, total))
}
