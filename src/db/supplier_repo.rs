// src/db/supplier_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::{map_unique_violation, AppError},
        response::Page,
    },
    db::{fetch_page, Specification, SupplierStore, SUPPLIER_SORT_FIELDS},
    models::{
        pagination::PageRequest,
        supplier::{NewSupplier, Supplier},
    },
};

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM supplier_view WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(supplier)
    }
}

fn duplicate_name(name: &str) -> impl FnOnce(&str) -> String + '_ {
    move |_: &str| format!("Já existe um fornecedor chamado '{}' nesta empresa.", name)
}

#[async_trait]
impl SupplierStore for SupplierRepository {
    async fn insert(&self, supplier: NewSupplier) -> Result<Supplier, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO suppliers (uuid, company_id, name, contact_name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(supplier.uuid)
        .bind(supplier.company_id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, duplicate_name(&supplier.name)))?;

        self.fetch_by_id(id).await
    }

    async fn update(&self, supplier: &Supplier) -> Result<Supplier, AppError> {
        sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $1, contact_name = $2, email = $3, phone = $4, address = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.is_active)
        .bind(supplier.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, duplicate_name(&supplier.name)))?;

        self.fetch_by_id(supplier.id).await
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM supplier_view WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    async fn exists_by_company_uuid_and_name_ignore_case(
        &self,
        company_uuid: Uuid,
        name: &str,
    ) -> Result<bool, AppError> {
        // Considera ativos e inativos: o nome é único por empresa em qualquer estado.
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM supplier_view WHERE company_uuid = $1 AND LOWER(name) = LOWER($2))",
        )
        .bind(company_uuid)
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_page(&self, spec: &Specification, page: &PageRequest) -> Result<Page<Supplier>, AppError> {
        fetch_page(&self.pool, "supplier_view", spec, page, SUPPLIER_SORT_FIELDS).await
    }
}
