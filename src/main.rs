//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::middleware::auth::auth_guard;

// Rotas públicas + rotas protegidas pelo auth_guard
fn router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/companies/register", post(handlers::company::register_company))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/verify-email", post(handlers::auth::verify_email))
        .route("/api/auth/resend-verification", post(handlers::auth::resend_verification))
        .route("/api/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/api/auth/reset-password", post(handlers::auth::reset_password));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        .route("/api/companies/me", get(handlers::company::get_my_company))
        // Fornecedores
        .route("/api/suppliers", post(handlers::supplier::create_supplier))
        .route(
            "/api/suppliers/{uuid}",
            get(handlers::supplier::get_supplier).put(handlers::supplier::update_supplier),
        )
        .route("/api/suppliers/{uuid}/status", patch(handlers::supplier::set_supplier_status))
        .route(
            "/api/suppliers/company/{company_uuid}",
            get(handlers::supplier::list_company_suppliers),
        )
        .route(
            "/api/suppliers/company/{company_uuid}/exists",
            get(handlers::supplier::supplier_name_exists),
        )
        // Produtos
        .route("/api/products", get(handlers::product::search_products))
        .route("/api/products/create", post(handlers::product::create_product))
        .route(
            "/api/products/{uuid}",
            get(handlers::product::get_product).put(handlers::product::update_product),
        )
        .route(
            "/api/products/deactivate/{uuid}",
            patch(handlers::product::deactivate_product),
        )
        // Pedidos
        .route("/api/orders", get(handlers::order::search_orders))
        .route("/api/orders/create", post(handlers::order::create_order))
        .route(
            "/api/orders/{uuid}",
            get(handlers::order::get_order).delete(handlers::order::delete_order),
        )
        .route("/api/orders/{uuid}/send", post(handlers::order::send_order))
        // Relatórios
        .route("/api/reports/dashboard", get(handlers::report::dashboard))
        .route("/api/reports/global", get(handlers::report::global))
        .route("/api/reports/global/pdf", get(handlers::report::global_pdf))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(docs::ApiDoc::openapi()) }))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let pool = config.connect().await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(AppState::new(&config, pool)?);

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
