// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, EmailPayload, LoginPayload, ResetPasswordPayload, TokenPayload, User},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Conta inativa ou e-mail não verificado"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let auth = app_state.auth_service.login(&payload.email, &payload.password).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok("Login efetuado com sucesso.", auth))))
}

// POST /api/auth/verify-email
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = "Auth",
    request_body = TokenPayload,
    responses(
        (status = 200, description = "E-mail verificado e empresa ativada"),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn verify_email(
    State(app_state): State<AppState>,
    Json(payload): Json<TokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.auth_service.verify_email(&payload.token).await?;
    Ok(Json(ApiResponse::message("E-mail verificado com sucesso.")))
}

// POST /api/auth/resend-verification
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    tag = "Auth",
    request_body = EmailPayload,
    responses(
        (status = 200, description = "Novo e-mail de verificação enviado"),
        (status = 400, description = "E-mail já verificado"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn resend_verification(
    State(app_state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.auth_service.resend_verification(&payload.email).await?;
    Ok(Json(ApiResponse::message("E-mail de verificação reenviado.")))
}

// POST /api/auth/forgot-password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = EmailPayload,
    responses(
        (status = 200, description = "E-mail de redefinição enviado"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.auth_service.forgot_password(&payload.email).await?;
    Ok(Json(ApiResponse::message(
        "Enviamos as instruções de redefinição de senha para o seu e-mail.",
    )))
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida"),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Senha redefinida com sucesso.")))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = ApiResponse<User>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::ok("Usuário autenticado.", user))
}
