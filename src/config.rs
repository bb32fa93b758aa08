// src/config.rs

use anyhow::Context;
use chrono::Duration;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, sync::Arc};

use crate::{
    db::{
        CompanyRepository, CompanyStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
        SupplierRepository, SupplierStore, UserRepository, UserStore,
    },
    services::{
        auth::{AuthService, AuthSettings},
        mail::{LogMailer, Mailer, SmtpMailer, SmtpSettings},
        order_service::OrderService,
        pdf::{GenPdfRenderer, ReportRenderer},
        product_service::ProductService,
        report_service::ReportService,
        supplier_service::SupplierService,
    },
};

// Tudo que vem do ambiente (.env é carregado antes, se existir)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub frontend_url: String,
    pub mail_from: String,
    pub fonts_dir: String,
    pub verification_token_ttl_hours: i64,
    pub reset_token_ttl_hours: i64,
    // Sem SMTP_HOST os e-mails só vão para o log
    pub smtp: Option<SmtpSettings>,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} deve ser definida", key))
}

fn optional<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Valor inválido para {}: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

fn smtp_from_env() -> anyhow::Result<Option<SmtpSettings>> {
    let host = match env::var("SMTP_HOST") {
        Ok(host) if !host.trim().is_empty() => host.trim().to_string(),
        _ => return Ok(None),
    };
    Ok(Some(SmtpSettings {
        host,
        port: optional("SMTP_PORT", 587)?,
        username: env::var("SMTP_USERNAME").ok(),
        password: env::var("SMTP_PASSWORD").ok(),
        starttls: optional("SMTP_STARTTLS", true)?,
    }))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs: optional("JWT_EXPIRATION_SECS", 3600)?,
            server_addr: optional("SERVER_ADDR", "0.0.0.0:3000".to_string())?,
            db_max_connections: optional("DB_MAX_CONNECTIONS", 5)?,
            frontend_url: optional("FRONTEND_URL", "http://localhost:4200".to_string())?,
            mail_from: optional("MAIL_FROM", "no-reply@supply.local".to_string())?,
            fonts_dir: optional("FONTS_DIR", "./fonts".to_string())?,
            verification_token_ttl_hours: optional("VERIFICATION_TOKEN_TTL_HOURS", 24)?,
            reset_token_ttl_hours: optional("RESET_TOKEN_TTL_HOURS", 1)?,
            smtp: smtp_from_env()?,
        })
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            jwt_expiration_secs: self.jwt_expiration_secs,
            verification_ttl: Duration::hours(self.verification_token_ttl_hours),
            reset_ttl: Duration::hours(self.reset_token_ttl_hours),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

// Os stores que os services usam; em produção, todos sobre o mesmo pool
pub struct Stores {
    pub companies: Arc<dyn CompanyStore>,
    pub users: Arc<dyn UserStore>,
    pub suppliers: Arc<dyn SupplierStore>,
    pub products: Arc<dyn ProductStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            companies: Arc::new(CompanyRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            suppliers: Arc::new(SupplierRepository::new(pool.clone())),
            products: Arc::new(ProductRepository::new(pool.clone())),
            orders: Arc::new(OrderRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub supplier_service: SupplierService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(config: &Config, pool: PgPool) -> anyhow::Result<Self> {
        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "📧 Envio de e-mails via SMTP");
                Arc::new(
                    SmtpMailer::new(&config.mail_from, &config.frontend_url, smtp.clone())
                        .context("Falha ao configurar o SMTP")?,
                )
            }
            None => {
                tracing::warn!("SMTP_HOST não definido: e-mails NÃO serão entregues, apenas registrados no log");
                Arc::new(LogMailer::new(config.mail_from.clone(), config.frontend_url.clone()))
            }
        };
        let renderer: Arc<dyn ReportRenderer> = Arc::new(GenPdfRenderer::new(config.fonts_dir.clone()));

        Ok(Self::from_parts(Stores::postgres(pool), mailer, renderer, config.auth_settings()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(
        stores: Stores,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn ReportRenderer>,
        auth: AuthSettings,
    ) -> Self {
        Self {
            auth_service: AuthService::new(
                stores.companies.clone(),
                stores.users.clone(),
                mailer.clone(),
                auth,
            ),
            supplier_service: SupplierService::new(stores.suppliers.clone()),
            product_service: ProductService::new(stores.products.clone(), stores.suppliers.clone()),
            order_service: OrderService::new(stores.orders.clone(), mailer),
            report_service: ReportService::new(stores.users, stores.companies, stores.orders, renderer),
        }
    }
}
