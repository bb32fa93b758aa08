// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyStore, UserStore},
    models::{
        auth::{AuthResponse, Claims, NewUser, Role, TokenKind, User},
        company::{Company, NewCompany, RegisterCompanyPayload, RegistrationResponse},
    },
    services::mail::Mailer,
};

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
    pub verification_ttl: Duration,
    pub reset_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AuthService {
    companies: Arc<dyn CompanyStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    settings: AuthSettings,
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    // bcrypt é caro: roda num thread de bloqueio para não travar o runtime
    let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

impl AuthService {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            companies,
            users,
            mailer,
            settings,
        }
    }

    // --- REGISTRO ---
    pub async fn register_company(
        &self,
        payload: RegisterCompanyPayload,
    ) -> Result<RegistrationResponse, AppError> {
        if self.companies.exists_by_tax_id(&payload.tax_id).await? {
            return Err(AppError::Duplicate(format!(
                "Já existe uma empresa com o NIF '{}'.",
                payload.tax_id
            )));
        }
        if self.users.exists_by_email(&payload.admin.email).await? {
            return Err(AppError::Duplicate(format!(
                "O e-mail '{}' já está em uso.",
                payload.admin.email
            )));
        }

        let password_hash = hash_password(&payload.admin.password, self.settings.bcrypt_cost).await?;
        let token = new_token();

        let company = NewCompany {
            uuid: Uuid::new_v4(),
            name: payload.name,
            tax_id: payload.tax_id,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            city: payload.city,
            postal_code: payload.postal_code,
            country: payload.country,
        };
        let admin = NewUser {
            uuid: Uuid::new_v4(),
            email: payload.admin.email,
            password_hash,
            first_name: payload.admin.first_name,
            last_name: payload.admin.last_name,
            role: Role::Admin,
            email_verification_token: Some(token.clone()),
            email_verification_expires_at: Some(Utc::now() + self.settings.verification_ttl),
        };

        let (company, admin) = self.companies.register(company, admin).await?;
        tracing::info!(company = %company.uuid, admin = %admin.email, "🏢 Empresa registrada");

        // O registro já foi gravado; o usuário pode pedir o reenvio.
        if let Err(e) = self.mailer.send_verification(&admin, &token).await {
            tracing::warn!(admin = %admin.email, "Falha ao enviar e-mail de verificação: {}", e);
        }

        Ok(RegistrationResponse {
            company,
            admin_email: admin.email,
        })
    }

    // --- LOGIN ---
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::BadRequest("A conta do usuário está desativada.".into()));
        }
        if !user.email_verified {
            return Err(AppError::BadRequest(
                "O e-mail ainda não foi verificado. Verifique sua caixa de entrada.".into(),
            ));
        }

        let token = self.create_token(&user.email)?;
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.settings.jwt_expiration_secs,
            email: user.email,
            role: user.role,
            company_uuid: user.company_uuid,
        })
    }

    // --- TOKENS DE USO ÚNICO ---
    async fn user_by_token(&self, kind: TokenKind, token: &str) -> Result<User, AppError> {
        let (invalid, expired) = match kind {
            TokenKind::EmailVerification => (
                "Token de verificação inválido.",
                "O token de verificação expirou. Solicite um novo.",
            ),
            TokenKind::PasswordReset => (
                "Token de redefinição de senha inválido.",
                "O token de redefinição de senha expirou. Solicite um novo.",
            ),
        };

        let user = self
            .users
            .find_by_token(kind, token)
            .await?
            .ok_or_else(|| AppError::BadRequest(invalid.into()))?;

        let expires_at = match kind {
            TokenKind::EmailVerification => user.email_verification_expires_at,
            TokenKind::PasswordReset => user.password_reset_expires_at,
        };
        if expires_at.is_none_or(|at| at < Utc::now()) {
            return Err(AppError::BadRequest(expired.into()));
        }
        Ok(user)
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let user = self.user_by_token(TokenKind::EmailVerification, token).await?;
        self.users.confirm_email(user.id, user.company_id).await?;
        tracing::info!(user = %user.email, "✅ E-mail verificado");
        Ok(())
    }

    async fn existing_user(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuário com e-mail '{}' não encontrado.", email)))
    }

    /// Um novo token substitui o anterior, que deixa de valer.
    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let user = self.existing_user(email).await?;
        if user.email_verified {
            return Err(AppError::BadRequest("O e-mail já foi verificado.".into()));
        }

        let token = new_token();
        let expires_at = Utc::now() + self.settings.verification_ttl;
        self.users
            .issue_token(user.id, TokenKind::EmailVerification, &token, expires_at)
            .await?;
        self.mailer.send_verification(&user, &token).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self.existing_user(email).await?;

        let token = new_token();
        let expires_at = Utc::now() + self.settings.reset_ttl;
        self.users
            .issue_token(user.id, TokenKind::PasswordReset, &token, expires_at)
            .await?;
        self.mailer.send_password_reset(&user, &token).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self.user_by_token(TokenKind::PasswordReset, token).await?;
        let password_hash = hash_password(new_password, self.settings.bcrypt_cost).await?;
        self.users.reset_password(user.id, &password_hash).await?;
        tracing::info!(user = %user.email, "🔑 Senha redefinida");
        Ok(())
    }

    // --- JWT ---
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.users
            .find_by_email(&token_data.claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.settings.jwt_expiration_secs);

        let claims = Claims {
            sub: email.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_ref()),
        )?)
    }

    pub async fn company_of(&self, user: &User) -> Result<Company, AppError> {
        self.companies
            .find_by_id(user.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa do usuário não encontrada.".into()))
    }
}
