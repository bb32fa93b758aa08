// src/db/company_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::CompanyStore,
    models::{
        auth::{NewUser, User},
        company::{Company, NewCompany},
    },
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn register(&self, company: NewCompany, admin: NewUser) -> Result<(Company, User), AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let tax_id = company.tax_id.clone();
        let created = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (uuid, name, tax_id, email, phone, address, city, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company.uuid)
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(&company.email)
        .bind(&company.phone)
        .bind(&company.address)
        .bind(&company.city)
        .bind(&company.postal_code)
        .bind(&company.country)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |_| format!("Já existe uma empresa com o NIF '{}'.", tax_id)))?;

        let email = admin.email.clone();
        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                uuid, company_id, email, password_hash, first_name, last_name, role,
                email_verification_token, email_verification_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(admin.uuid)
        .bind(created.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(admin.role)
        .bind(&admin.email_verification_token)
        .bind(admin.email_verification_expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |_| format!("O e-mail '{}' já está em uso.", email)))?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM user_view WHERE id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        // Se chegou aqui, deu tudo certo. Se algo falhar antes, o drop do tx faz rollback.
        tx.commit().await?;

        Ok((created, user))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE tax_id = $1)")
            .bind(tax_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
