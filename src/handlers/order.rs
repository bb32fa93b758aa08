// src/handlers/order.rs

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
        order::{CreateOrderPayload, Order, OrderDetail, OrderFilter},
        pagination::PageRequest,
    },
};

// POST /api/orders/create
#[utoipa::path(
    post,
    path = "/api/orders/create",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado (PENDING) com itens e total", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Quantidade inválida, produto/fornecedor inativo ou de outro fornecedor"),
        (status = 404, description = "Fornecedor ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.create_order(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Pedido criado com sucesso.", order)),
    ))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(OrderFilter, PageRequest),
    responses(
        (status = 200, description = "Página de pedidos da empresa", body = ApiResponse<Page<Order>>),
        (status = 400, description = "Data em formato inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn search_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<OrderFilter>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.search_orders(&user, filter, &page).await?;
    Ok(Json(ApiResponse::ok("Pedidos encontrados.", orders)))
}

// GET /api/orders/{uuid}
#[utoipa::path(
    get,
    path = "/api/orders/{uuid}",
    tag = "Orders",
    params(("uuid" = Uuid, Path, description = "UUID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get_order(&user, uuid).await?;
    Ok(Json(ApiResponse::ok("Pedido encontrado.", order)))
}

// POST /api/orders/{uuid}/send
#[utoipa::path(
    post,
    path = "/api/orders/{uuid}/send",
    tag = "Orders",
    params(("uuid" = Uuid, Path, description = "UUID do pedido")),
    responses(
        (status = 200, description = "Pedido enviado ao fornecedor (SENT)", body = ApiResponse<Order>),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido não está PENDING"),
        (status = 500, description = "Falha no envio do e-mail; o pedido continua PENDING")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.send_order(&user, uuid).await?;
    Ok(Json(ApiResponse::ok("Pedido enviado ao fornecedor.", order)))
}

// DELETE /api/orders/{uuid}
#[utoipa::path(
    delete,
    path = "/api/orders/{uuid}",
    tag = "Orders",
    params(("uuid" = Uuid, Path, description = "UUID do pedido")),
    responses(
        (status = 200, description = "Pedido marcado como DELETED"),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.order_service.delete_order(&user, uuid).await?;
    Ok(Json(ApiResponse::message("Pedido excluído.")))
}
