// src/handlers/product.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{ApiResponse, Page},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        pagination::PageRequest,
        product::{CreateProductPayload, Product, ProductFilter, UpdateProductPayload},
    },
};

// POST /api/products/create
#[utoipa::path(
    post,
    path = "/api/products/create",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ApiResponse<Product>),
        (status = 400, description = "Dados inválidos (ex: preço negativo)"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Produto criado com sucesso.", product)),
    ))
}

// GET /api/products/{uuid}
#[utoipa::path(
    get,
    path = "/api/products/{uuid}",
    tag = "Products",
    params(("uuid" = Uuid, Path, description = "UUID do produto")),
    responses(
        (status = 200, description = "Produto", body = ApiResponse<Product>),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(&user, uuid).await?;
    Ok(Json(ApiResponse::ok("Produto encontrado.", product)))
}

// PUT /api/products/{uuid}
#[utoipa::path(
    put,
    path = "/api/products/{uuid}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("uuid" = Uuid, Path, description = "UUID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = ApiResponse<Product>),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.update(&user, uuid, payload).await?;
    Ok(Json(ApiResponse::ok("Produto atualizado com sucesso.", product)))
}

// PATCH /api/products/deactivate/{uuid}
#[utoipa::path(
    patch,
    path = "/api/products/deactivate/{uuid}",
    tag = "Products",
    params(("uuid" = Uuid, Path, description = "UUID do produto")),
    responses(
        (status = 200, description = "Produto desativado (soft delete)", body = ApiResponse<Product>),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.deactivate(&user, uuid).await?;
    Ok(Json(ApiResponse::ok("Produto desativado.", product)))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductFilter, PageRequest),
    responses(
        (status = 200, description = "Página de produtos da empresa", body = ApiResponse<Page<Product>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.search(&user, filter, &page).await?;
    Ok(Json(ApiResponse::ok("Produtos encontrados.", products)))
}
