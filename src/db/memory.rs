// src/db/memory.rs
//
// Store em memória para os testes. Avalia as mesmas `Condition`s que o
// repositório do Postgres traduz para SQL, com a mesma semântica de NULL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::{cmp::Ordering, sync::Mutex};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::{
        filters::{Condition, FilterValue},
        CompanyStore, OrderStore, ProductStore, Specification, SupplierStore, UserStore,
        DEFAULT_SORT, ORDER_SORT_FIELDS, PRODUCT_SORT_FIELDS, SUPPLIER_SORT_FIELDS,
    },
    models::{
        auth::{NewUser, Role, TokenKind, User},
        company::{Company, CompanyStatus, NewCompany},
        order::{Order, OrderDraft, OrderItem, OrderStatus},
        pagination::{PageRequest, SortDirection},
        product::{NewProduct, Product},
        supplier::{NewSupplier, Supplier},
    },
};

/// Valor de uma coluna lido de uma linha em memória.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Text(Option<&'a str>),
    Decimal(Option<Decimal>),
    Time(Option<DateTime<Utc>>),
    Uuid(Option<Uuid>),
    Bool(bool),
    Status(OrderStatus),
}

pub trait Fields {
    fn id(&self) -> i64;
    fn field(&self, column: &str) -> Option<Field<'_>>;
}

fn compare(field: Field<'_>, value: &FilterValue) -> Option<Ordering> {
    match (field, value) {
        (Field::Text(Some(a)), FilterValue::Text(b)) => Some(a.cmp(b.as_str())),
        (Field::Decimal(Some(a)), FilterValue::Decimal(b)) => Some(a.cmp(b)),
        (Field::Time(Some(a)), FilterValue::Time(b)) => Some(a.cmp(b)),
        (Field::Uuid(Some(a)), FilterValue::Uuid(b)) => Some(a.cmp(b)),
        (Field::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
        (Field::Status(a), FilterValue::Status(b)) => (a == *b)
            .then_some(Ordering::Equal)
            .or(Some(Ordering::Less)),
        // NULL em SQL: qualquer comparação é falsa
        _ => None,
    }
}

fn text_contains(row: &impl Fields, column: &str, needle: &str) -> bool {
    match row.field(column) {
        Some(Field::Text(Some(value))) => value.to_lowercase().contains(needle),
        _ => false,
    }
}

pub fn matches(spec: &Specification, row: &impl Fields) -> bool {
    spec.conditions().iter().all(|condition| match condition {
        Condition::Contains { column, needle } => text_contains(row, column, needle),
        Condition::AnyContains { columns, needle } => {
            columns.iter().any(|column| text_contains(row, column, needle))
        }
        Condition::Eq { column, value } => row
            .field(column)
            .and_then(|f| compare(f, value))
            .is_some_and(|o| o == Ordering::Equal),
        Condition::NotEq { column, value } => row
            .field(column)
            .and_then(|f| compare(f, value))
            .is_some_and(|o| o != Ordering::Equal),
        Condition::AtLeast { column, value } => row
            .field(column)
            .and_then(|f| compare(f, value))
            .is_some_and(|o| o != Ordering::Less),
        Condition::AtMost { column, value } => row
            .field(column)
            .and_then(|f| compare(f, value))
            .is_some_and(|o| o != Ordering::Greater),
    })
}

fn sort_key_cmp(a: Option<Field<'_>>, b: Option<Field<'_>>) -> Ordering {
    match (a, b) {
        (Some(Field::Text(a)), Some(Field::Text(b))) => a.cmp(&b),
        (Some(Field::Decimal(a)), Some(Field::Decimal(b))) => a.cmp(&b),
        (Some(Field::Time(a)), Some(Field::Time(b))) => a.cmp(&b),
        (Some(Field::Uuid(a)), Some(Field::Uuid(b))) => a.cmp(&b),
        (Some(Field::Bool(a)), Some(Field::Bool(b))) => a.cmp(&b),
        (Some(Field::Status(a)), Some(Field::Status(b))) => (a as u8).cmp(&(b as u8)),
        _ => Ordering::Equal,
    }
}

fn page_of<T>(
    rows: &[T],
    spec: &Specification,
    page: &PageRequest,
    sort_fields: &[(&'static str, &'static str)],
) -> Page<T>
where
    T: Fields + Clone,
{
    let sort = page.resolve_sort(sort_fields, DEFAULT_SORT);
    let mut filtered: Vec<T> = rows.iter().filter(|r| matches(spec, *r)).cloned().collect();
    filtered.sort_by(|a, b| {
        let ord = sort_key_cmp(a.field(sort.column), b.field(sort.column));
        let ord = match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then(a.id().cmp(&b.id()))
    });

    let total = filtered.len() as i64;
    let content = filtered
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size() as usize)
        .collect();
    Page::new(content, page, sort.field, total)
}

impl Fields for Supplier {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<Field<'_>> {
        Some(match column {
            "uuid" => Field::Uuid(Some(self.uuid)),
            "company_uuid" => Field::Uuid(Some(self.company_uuid)),
            "name" => Field::Text(Some(&self.name)),
            "contact_name" => Field::Text(self.contact_name.as_deref()),
            "email" => Field::Text(self.email.as_deref()),
            "phone" => Field::Text(self.phone.as_deref()),
            "address" => Field::Text(self.address.as_deref()),
            "is_active" => Field::Bool(self.is_active),
            "created_at" => Field::Time(Some(self.created_at)),
            "updated_at" => Field::Time(Some(self.updated_at)),
            _ => return None,
        })
    }
}

impl Fields for Product {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<Field<'_>> {
        Some(match column {
            "uuid" => Field::Uuid(Some(self.uuid)),
            "supplier_uuid" => Field::Uuid(Some(self.supplier_uuid)),
            "company_uuid" => Field::Uuid(Some(self.company_uuid)),
            "name" => Field::Text(Some(&self.name)),
            "description" => Field::Text(self.description.as_deref()),
            "category" => Field::Text(self.category.as_deref()),
            "unit" => Field::Text(self.unit.as_deref()),
            "price" => Field::Decimal(Some(self.price)),
            "is_active" => Field::Bool(self.is_active),
            "created_at" => Field::Time(Some(self.created_at)),
            "updated_at" => Field::Time(Some(self.updated_at)),
            _ => return None,
        })
    }
}

impl Fields for Order {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<Field<'_>> {
        Some(match column {
            "uuid" => Field::Uuid(Some(self.uuid)),
            "company_uuid" => Field::Uuid(Some(self.company_uuid)),
            "supplier_uuid" => Field::Uuid(Some(self.supplier_uuid)),
            "user_uuid" => Field::Uuid(self.user_uuid),
            "name" => Field::Text(Some(&self.name)),
            "notes" => Field::Text(self.notes.as_deref()),
            "status" => Field::Status(self.status),
            "total_amount" => Field::Decimal(Some(self.total_amount)),
            "delivery_date" => Field::Time(self.delivery_date),
            "created_at" => Field::Time(Some(self.created_at)),
            "updated_at" => Field::Time(Some(self.updated_at)),
            _ => return None,
        })
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    companies: Vec<Company>,
    users: Vec<User>,
    suppliers: Vec<Supplier>,
    products: Vec<Product>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn order_item_count(&self) -> usize {
        self.lock().items.len()
    }

    pub fn company(&self, id: i64) -> Option<Company> {
        self.lock().companies.iter().find(|c| c.id == id).cloned()
    }

    /// Permite posicionar pedidos no tempo para os testes de relatório.
    pub fn set_order_created_at(&self, uuid: Uuid, created_at: DateTime<Utc>) {
        let mut t = self.lock();
        if let Some(order) = t.orders.iter_mut().find(|o| o.uuid == uuid) {
            order.created_at = created_at;
        }
    }

    /// Altera o preço "por fora" do service (simula edição concorrente do catálogo).
    pub fn set_product_price(&self, uuid: Uuid, price: Decimal) {
        let mut t = self.lock();
        if let Some(product) = t.products.iter_mut().find(|p| p.uuid == uuid) {
            product.price = price;
        }
    }

    pub fn set_user_active(&self, email: &str, active: bool) {
        let mut t = self.lock();
        if let Some(user) = t.users.iter_mut().find(|u| u.email.eq_ignore_ascii_case(email)) {
            user.is_active = active;
        }
    }

    pub fn expire_tokens(&self, email: &str) {
        let past = Utc::now() - chrono::Duration::hours(1);
        let mut t = self.lock();
        if let Some(user) = t.users.iter_mut().find(|u| u.email.eq_ignore_ascii_case(email)) {
            if user.email_verification_token.is_some() {
                user.email_verification_expires_at = Some(past);
            }
            if user.password_reset_token.is_some() {
                user.password_reset_expires_at = Some(past);
            }
        }
    }

    /// Usuário extra (já verificado) numa empresa existente.
    pub fn add_user(&self, company_id: i64, email: &str, role: Role) -> User {
        let mut t = self.lock();
        let company_uuid = t
            .companies
            .iter()
            .find(|c| c.id == company_id)
            .map(|c| c.uuid)
            .unwrap_or_default();
        let now = Utc::now();
        let user = User {
            id: t.next_id(),
            uuid: Uuid::new_v4(),
            company_id,
            company_uuid,
            email: email.to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            role,
            is_active: true,
            email_verified: true,
            email_verification_token: None,
            email_verification_expires_at: None,
            password_reset_token: None,
            password_reset_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        user
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn register(&self, company: NewCompany, admin: NewUser) -> Result<(Company, User), AppError> {
        let mut t = self.lock();
        if t.companies.iter().any(|c| c.tax_id == company.tax_id) {
            return Err(AppError::Duplicate(format!(
                "Já existe uma empresa com o NIF '{}'.",
                company.tax_id
            )));
        }
        if t.users.iter().any(|u| u.email.eq_ignore_ascii_case(&admin.email)) {
            return Err(AppError::Duplicate(format!("O e-mail '{}' já está em uso.", admin.email)));
        }

        let now = Utc::now();
        let created = Company {
            id: t.next_id(),
            uuid: company.uuid,
            name: company.name,
            tax_id: company.tax_id,
            email: company.email,
            phone: company.phone,
            address: company.address,
            city: company.city,
            postal_code: company.postal_code,
            country: company.country,
            status: CompanyStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let user = User {
            id: t.next_id(),
            uuid: admin.uuid,
            company_id: created.id,
            company_uuid: created.uuid,
            email: admin.email,
            password_hash: admin.password_hash,
            first_name: admin.first_name,
            last_name: admin.last_name,
            role: admin.role,
            is_active: true,
            email_verified: false,
            email_verification_token: admin.email_verification_token,
            email_verification_expires_at: admin.email_verification_expires_at,
            password_reset_token: None,
            password_reset_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        t.companies.push(created.clone());
        t.users.push(user.clone());
        Ok((created, user))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        Ok(self.company(id))
    }

    async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, AppError> {
        Ok(self.lock().companies.iter().any(|c| c.tax_id == tax_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.user(email))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.user(email).is_some())
    }

    async fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<User>, AppError> {
        let t = self.lock();
        Ok(t.users
            .iter()
            .find(|u| {
                let stored = match kind {
                    TokenKind::EmailVerification => u.email_verification_token.as_deref(),
                    TokenKind::PasswordReset => u.password_reset_token.as_deref(),
                };
                stored == Some(token)
            })
            .cloned())
    }

    async fn issue_token(
        &self,
        user_id: i64,
        kind: TokenKind,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut t = self.lock();
        if let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) {
            match kind {
                TokenKind::EmailVerification => {
                    user.email_verification_token = Some(token.to_string());
                    user.email_verification_expires_at = Some(expires_at);
                    user.password_reset_token = None;
                    user.password_reset_expires_at = None;
                }
                TokenKind::PasswordReset => {
                    user.password_reset_token = Some(token.to_string());
                    user.password_reset_expires_at = Some(expires_at);
                    user.email_verification_token = None;
                    user.email_verification_expires_at = None;
                }
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn confirm_email(&self, user_id: i64, company_id: i64) -> Result<(), AppError> {
        let mut t = self.lock();
        if let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) {
            user.email_verified = true;
            user.email_verification_token = None;
            user.email_verification_expires_at = None;
        }
        if let Some(company) = t
            .companies
            .iter_mut()
            .find(|c| c.id == company_id && c.status == CompanyStatus::Pending)
        {
            company.status = CompanyStatus::Active;
        }
        Ok(())
    }

    async fn reset_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut t = self.lock();
        if let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) {
            user.password_hash = password_hash.to_string();
            user.password_reset_token = None;
            user.password_reset_expires_at = None;
        }
        Ok(())
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[async_trait]
impl SupplierStore for MemoryStore {
    async fn insert(&self, supplier: NewSupplier) -> Result<Supplier, AppError> {
        let mut t = self.lock();
        // Espelha o índice único (company_id, LOWER(name))
        if t.suppliers
            .iter()
            .any(|s| s.company_id == supplier.company_id && same_name(&s.name, &supplier.name))
        {
            return Err(AppError::Duplicate(format!(
                "Já existe um fornecedor chamado '{}' nesta empresa.",
                supplier.name
            )));
        }
        let company_uuid = t
            .companies
            .iter()
            .find(|c| c.id == supplier.company_id)
            .map(|c| c.uuid)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("empresa inexistente")))?;

        let now = Utc::now();
        let created = Supplier {
            id: t.next_id(),
            uuid: supplier.uuid,
            company_id: supplier.company_id,
            company_uuid,
            name: supplier.name,
            contact_name: supplier.contact_name,
            email: supplier.email,
            phone: supplier.phone,
            address: supplier.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.suppliers.push(created.clone());
        Ok(created)
    }

    async fn update(&self, supplier: &Supplier) -> Result<Supplier, AppError> {
        let mut t = self.lock();
        if t.suppliers.iter().any(|s| {
            s.id != supplier.id && s.company_id == supplier.company_id && same_name(&s.name, &supplier.name)
        }) {
            return Err(AppError::Duplicate(format!(
                "Já existe um fornecedor chamado '{}' nesta empresa.",
                supplier.name
            )));
        }
        let stored = t
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier.id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        *stored = Supplier {
            updated_at: Utc::now(),
            ..supplier.clone()
        };
        Ok(stored.clone())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Supplier>, AppError> {
        Ok(self.lock().suppliers.iter().find(|s| s.uuid == uuid).cloned())
    }

    async fn exists_by_company_uuid_and_name_ignore_case(
        &self,
        company_uuid: Uuid,
        name: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .lock()
            .suppliers
            .iter()
            .any(|s| s.company_uuid == company_uuid && same_name(&s.name, name)))
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Supplier>, AppError> {
        Ok(page_of(&self.lock().suppliers, spec, page, SUPPLIER_SORT_FIELDS))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut t = self.lock();
        let supplier = t
            .suppliers
            .iter()
            .find(|s| s.id == product.supplier_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("fornecedor inexistente")))?;

        let now = Utc::now();
        let created = Product {
            id: t.next_id(),
            uuid: product.uuid,
            supplier_id: supplier.id,
            supplier_uuid: supplier.uuid,
            supplier_name: supplier.name,
            company_id: supplier.company_id,
            company_uuid: supplier.company_uuid,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            unit: product.unit,
            volume: product.volume,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let mut t = self.lock();
        let stored = t
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        *stored = Product {
            updated_at: Utc::now(),
            ..product.clone()
        };
        Ok(stored.clone())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.lock().products.iter().find(|p| p.uuid == uuid).cloned())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        let mut t = self.lock();
        if let Some(product) = t.products.iter_mut().find(|p| p.id == id) {
            product.is_active = active;
            product.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Product>, AppError> {
        Ok(page_of(&self.lock().products, spec, page, PRODUCT_SORT_FIELDS))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_with_items(&self, draft: OrderDraft) -> Result<Order, AppError> {
        // O lock cobre leitura, validação e escrita: é a "transação" da memória.
        let mut t = self.lock();

        let supplier = t.suppliers.iter().find(|s| s.uuid == draft.supplier_uuid).cloned();
        let products: Vec<Option<Product>> = draft
            .lines
            .iter()
            .map(|line| t.products.iter().find(|p| p.uuid == line.product_uuid).cloned())
            .collect();
        let priced = draft.price(supplier, &products)?;
        let supplier = priced.supplier;

        let company_uuid = t
            .companies
            .iter()
            .find(|c| c.id == draft.company_id)
            .map(|c| c.uuid)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        let user_uuid = draft
            .user_id
            .and_then(|id| t.users.iter().find(|u| u.id == id).map(|u| u.uuid));

        let now = Utc::now();
        let created = Order {
            id: t.next_id(),
            uuid: draft.uuid,
            company_id: draft.company_id,
            company_uuid,
            supplier_id: supplier.id,
            supplier_uuid: supplier.uuid,
            supplier_name: supplier.name,
            supplier_email: supplier.email,
            user_id: draft.user_id,
            user_uuid,
            name: draft.name,
            notes: draft.notes,
            total_amount: priced.total_amount,
            status: OrderStatus::Pending,
            delivery_date: draft.delivery_date,
            created_at: now,
            updated_at: now,
        };

        for (item, product) in priced.items.into_iter().zip(products.into_iter().flatten()) {
            let id = t.next_id();
            t.items.push(OrderItem {
                id,
                order_id: created.id,
                product_id: product.id,
                product_uuid: product.uuid,
                product_name: product.name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                notes: item.notes,
            });
        }
        t.orders.push(created.clone());
        Ok(created)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Order>, AppError> {
        Ok(self.lock().orders.iter().find(|o| o.uuid == uuid).cloned())
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find_items_for_orders(&self, order_ids: &[i64]) -> Result<Vec<OrderItem>, AppError> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|i| order_ids.contains(&i.order_id))
            .cloned()
            .collect())
    }

    async fn transition_status(
        &self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
    ) -> Result<bool, AppError> {
        let mut t = self.lock();
        match t
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && from.is_none_or(|expected| o.status == expected))
        {
            Some(order) => {
                order.status = to;
                order.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_in_window(
        &self,
        company_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.company_id == company_id && o.created_at >= start && o.created_at <= end)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Order>, AppError> {
        Ok(page_of(&self.lock().orders, spec, page, ORDER_SORT_FIELDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supplier::SupplierFilter;

    fn supplier(id: i64, name: &str, email: Option<&str>) -> Supplier {
        let now = Utc::now();
        Supplier {
            id,
            uuid: Uuid::new_v4(),
            company_id: 1,
            company_uuid: Uuid::nil(),
            name: name.to_string(),
            contact_name: None,
            email: email.map(str::to_string),
            phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn contains_is_case_insensitive_substring() {
        let spec = SupplierFilter {
            name: Some("oli".into()),
            ..Default::default()
        }
        .to_specification();

        assert!(matches(&spec, &supplier(1, "Oli d'oliva", None)));
        assert!(matches(&spec, &supplier(2, "OLIVES", None)));
        assert!(!matches(&spec, &supplier(3, "Pa", None)));
    }

    #[test]
    fn null_columns_never_match_text_filters() {
        let spec = SupplierFilter {
            email: Some("acme".into()),
            ..Default::default()
        }
        .to_specification();
        assert!(!matches(&spec, &supplier(1, "Acme", None)));
        assert!(matches(&spec, &supplier(2, "Other", Some("sales@ACME.com"))));
    }

    #[test]
    fn pages_are_sorted_with_stable_tie_break() {
        let rows = vec![
            supplier(3, "Bravo", None),
            supplier(1, "alpha", None),
            supplier(2, "Charlie", None),
        ];
        let request = PageRequest::new(0, 2).sorted_by("name", SortDirection::Asc);
        let page = page_of(&rows, &Specification::new(), &request, SUPPLIER_SORT_FIELDS);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<_> = page.content.iter().map(|s| s.name.as_str()).collect();
        // ordenação binária, como o ORDER BY com collation "C"
        assert_eq!(names, vec!["Bravo", "Charlie"]);
    }
}
