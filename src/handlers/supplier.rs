// src/handlers/supplier.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
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
        supplier::{Supplier, SupplierFilter, SupplierPayload, SupplierStatusPayload},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    pub name: String,
}

// POST /api/suppliers
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = ApiResponse<Supplier>),
        (status = 409, description = "Já existe um fornecedor com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_service.create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Fornecedor criado com sucesso.", supplier)),
    ))
}

// GET /api/suppliers/{uuid}
#[utoipa::path(
    get,
    path = "/api/suppliers/{uuid}",
    tag = "Suppliers",
    params(("uuid" = Uuid, Path, description = "UUID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor", body = ApiResponse<Supplier>),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = app_state.supplier_service.get(&user, uuid).await?;
    Ok(Json(ApiResponse::ok("Fornecedor encontrado.", supplier)))
}

// PUT /api/suppliers/{uuid}
#[utoipa::path(
    put,
    path = "/api/suppliers/{uuid}",
    tag = "Suppliers",
    request_body = SupplierPayload,
    params(("uuid" = Uuid, Path, description = "UUID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = ApiResponse<Supplier>),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Já existe um fornecedor com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<SupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_service.update(&user, uuid, payload).await?;
    Ok(Json(ApiResponse::ok("Fornecedor atualizado com sucesso.", supplier)))
}

// GET /api/suppliers/company/{company_uuid}
#[utoipa::path(
    get,
    path = "/api/suppliers/company/{company_uuid}",
    tag = "Suppliers",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        SupplierFilter,
        PageRequest
    ),
    responses(
        (status = 200, description = "Página de fornecedores", body = ApiResponse<Page<Supplier>>),
        (status = 403, description = "Empresa de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_company_suppliers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(company_uuid): Path<Uuid>,
    Query(filter): Query<SupplierFilter>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let suppliers = app_state
        .supplier_service
        .list_by_company(&user, company_uuid, filter, &page)
        .await?;
    Ok(Json(ApiResponse::ok("Fornecedores encontrados.", suppliers)))
}

// GET /api/suppliers/company/{company_uuid}/exists?name=
#[utoipa::path(
    get,
    path = "/api/suppliers/company/{company_uuid}/exists",
    tag = "Suppliers",
    params(
        ("company_uuid" = Uuid, Path, description = "UUID da empresa"),
        NameQuery
    ),
    responses(
        (status = 200, description = "Se já existe fornecedor com o nome (sem diferenciar maiúsculas)", body = ApiResponse<bool>)
    ),
    security(("api_jwt" = []))
)]
pub async fn supplier_name_exists(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(company_uuid): Path<Uuid>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let exists = app_state
        .supplier_service
        .exists_by_company_uuid_and_name_ignore_case(company_uuid, &query.name)
        .await?;
    Ok(Json(ApiResponse::ok("Consulta realizada.", exists)))
}

// PATCH /api/suppliers/{uuid}/status
#[utoipa::path(
    patch,
    path = "/api/suppliers/{uuid}/status",
    tag = "Suppliers",
    request_body = SupplierStatusPayload,
    params(("uuid" = Uuid, Path, description = "UUID do fornecedor")),
    responses(
        (status = 200, description = "Status alterado", body = ApiResponse<Supplier>),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_supplier_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(uuid): Path<Uuid>,
    Json(payload): Json<SupplierStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let supplier = app_state
        .supplier_service
        .set_status(&user, uuid, payload.is_active)
        .await?;
    let message = if supplier.is_active {
        "Fornecedor ativado."
    } else {
        "Fornecedor desativado."
    };
    Ok(Json(ApiResponse::ok(message, supplier)))
}
