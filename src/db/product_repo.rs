// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::Page},
    db::{fetch_page, ProductStore, Specification, PRODUCT_SORT_FIELDS},
    models::{
        pagination::PageRequest,
        product::{NewProduct, Product},
    },
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM product_view WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (uuid, supplier_id, name, description, category, price, unit, volume)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(product.uuid)
        .bind(product.supplier_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.unit)
        .bind(product.volume)
        .fetch_one(&self.pool)
        .await?;

        self.fetch_by_id(id).await
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, description = $2, category = $3, price = $4, unit = $5, volume = $6,
                updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.unit)
        .bind(product.volume)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        self.fetch_by_id(product.id).await
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM product_view WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE products SET is_active = $1, updated_at = NOW() WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Product>, AppError> {
        fetch_page(&self.pool, "product_view", spec, page, PRODUCT_SORT_FIELDS).await
    }
}
