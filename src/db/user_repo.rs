// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{TokenKind, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Busca um usuário pelo seu e-mail (comparação sem diferenciar maiúsculas)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM user_view WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn find_by_token(&self, kind: TokenKind, token: &str) -> Result<Option<User>, AppError> {
        let sql = match kind {
            TokenKind::EmailVerification => "SELECT * FROM user_view WHERE email_verification_token = $1",
            TokenKind::PasswordReset => "SELECT * FROM user_view WHERE password_reset_token = $1",
        };
        let maybe_user = sqlx::query_as::<_, User>(sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn issue_token(
        &self,
        user_id: i64,
        kind: TokenKind,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        // O token novo substitui o anterior do mesmo tipo e anula o do outro tipo.
        let sql = match kind {
            TokenKind::EmailVerification => {
                r#"
                UPDATE users
                SET email_verification_token = $1, email_verification_expires_at = $2,
                    password_reset_token = NULL, password_reset_expires_at = NULL,
                    updated_at = NOW()
                WHERE id = $3
                "#
            }
            TokenKind::PasswordReset => {
                r#"
                UPDATE users
                SET password_reset_token = $1, password_reset_expires_at = $2,
                    email_verification_token = NULL, email_verification_expires_at = NULL,
                    updated_at = NOW()
                WHERE id = $3
                "#
            }
        };
        sqlx::query(sql)
            .bind(token)
            .bind(expires_at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn confirm_email(&self, user_id: i64, company_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET email_verified = TRUE,
                email_verification_token = NULL, email_verification_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE companies SET status = 'ACTIVE', updated_at = NOW() WHERE id = $1 AND status = 'PENDING'",
        )
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reset_password(&self, user_id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1,
                password_reset_token = NULL, password_reset_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
