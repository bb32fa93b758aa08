// src/db/order_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::{fetch_page, OrderStore, Specification, ORDER_SORT_FIELDS},
    models::{
        order::{Order, OrderDraft, OrderItem, OrderStatus},
        pagination::PageRequest,
        product::Product,
        supplier::Supplier,
    },
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create_with_items(&self, draft: OrderDraft) -> Result<Order, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        // Qualquer `?` daqui em diante descarta o `tx` sem commit (rollback):
        // nunca fica um pedido órfão sem itens.
        let mut tx = self.pool.begin().await?;

        // FOR SHARE segura fornecedor e produtos até o commit: status e preço
        // lidos aqui são os que valem para o pedido.
        sqlx::query("SELECT id FROM suppliers WHERE uuid = $1 FOR SHARE")
            .bind(draft.supplier_uuid)
            .execute(&mut *tx)
            .await?;
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM supplier_view WHERE uuid = $1")
            .bind(draft.supplier_uuid)
            .fetch_optional(&mut *tx)
            .await?;

        let product_uuids: Vec<Uuid> = draft.lines.iter().map(|l| l.product_uuid).collect();
        let found: Vec<Product> = if product_uuids.is_empty() {
            Vec::new()
        } else {
            sqlx::query("SELECT id FROM products WHERE uuid = ANY($1) ORDER BY id FOR SHARE")
                .bind(&product_uuids[..])
                .execute(&mut *tx)
                .await?;
            sqlx::query_as::<_, Product>("SELECT * FROM product_view WHERE uuid = ANY($1)")
                .bind(&product_uuids[..])
                .fetch_all(&mut *tx)
                .await?
        };
        let products: Vec<Option<Product>> = draft
            .lines
            .iter()
            .map(|line| found.iter().find(|p| p.uuid == line.product_uuid).cloned())
            .collect();

        let priced = draft.price(supplier, &products)?;

        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                uuid, company_id, supplier_id, user_id, name, notes,
                total_amount, status, delivery_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING', $8)
            RETURNING id
            "#,
        )
        .bind(draft.uuid)
        .bind(draft.company_id)
        .bind(priced.supplier.id)
        .bind(draft.user_id)
        .bind(&draft.name)
        .bind(&draft.notes)
        .bind(priced.total_amount)
        .bind(draft.delivery_date)
        .fetch_one(&mut *tx)
        .await?;

        for item in &priced.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price, notes)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(&item.notes)
            .execute(&mut *tx)
            .await?;
        }

        let created = sqlx::query_as::<_, Order>("SELECT * FROM order_view WHERE id = $1")
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(created)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM order_view WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_item_view WHERE order_id = $1 ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_items_for_orders(&self, order_ids: &[i64]) -> Result<Vec<OrderItem>, AppError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_item_view WHERE order_id = ANY($1) ORDER BY order_id ASC, id ASC",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn transition_status(
        &self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
    ) -> Result<bool, AppError> {
        let result = match from {
            Some(expected) => {
                sqlx::query(
                    "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
                )
                .bind(to)
                .bind(order_id)
                .bind(expected)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
                    .bind(to)
                    .bind(order_id)
                    .execute(&self.pool)
                    .await?
            }
        };
        Ok(result.rows_affected() == 1)
    }

    async fn find_in_window(
        &self,
        company_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM order_view
            WHERE company_id = $1 AND created_at >= $2 AND created_at <= $3
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(company_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Order>, AppError> {
        fetch_page(&self.pool, "order_view", spec, page, ORDER_SORT_FIELDS).await
    }
}
