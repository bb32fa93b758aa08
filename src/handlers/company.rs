// src/handlers/company.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::company::{Company, RegisterCompanyPayload, RegistrationResponse},
};

// POST /api/companies/register (público)
#[utoipa::path(
    post,
    path = "/api/companies/register",
    tag = "Companies",
    request_body = RegisterCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada (PENDING) e e-mail de verificação enviado", body = ApiResponse<RegistrationResponse>),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "NIF ou e-mail já cadastrado")
    )
)]
pub async fn register_company(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let registration = app_state.auth_service.register_company(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Empresa registrada. Verifique o e-mail do administrador para ativá-la.",
            registration,
        )),
    ))
}

// GET /api/companies/me
#[utoipa::path(
    get,
    path = "/api/companies/me",
    tag = "Companies",
    responses(
        (status = 200, description = "Empresa do usuário autenticado", body = ApiResponse<Company>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.auth_service.company_of(&user).await?;
    Ok(Json(ApiResponse::ok("Empresa encontrada.", company)))
}
