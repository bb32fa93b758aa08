// src/handlers/report.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::report::{DashboardInfo, GlobalInfo, ReportRange},
};

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Indicadores dos últimos 30 dias", body = ApiResponse<DashboardInfo>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let info = app_state.report_service.dashboard_info(&user.email, Utc::now()).await?;
    Ok(Json(ApiResponse::ok("Dashboard gerado.", info)))
}

// GET /api/reports/global?startDate=&endDate=
#[utoipa::path(
    get,
    path = "/api/reports/global",
    tag = "Reports",
    params(ReportRange),
    responses(
        (status = 200, description = "Relatório global do período", body = ApiResponse<GlobalInfo>),
        (status = 400, description = "Data inválida ou período invertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn global(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let info = app_state
        .report_service
        .global_info(&user.email, &range, Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok("Relatório gerado.", info)))
}

// GET /api/reports/global/pdf
#[utoipa::path(
    get,
    path = "/api/reports/global/pdf",
    tag = "Reports",
    params(ReportRange),
    responses(
        (status = 200, description = "Relatório global em PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Data inválida ou período invertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn global_pdf(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state
        .report_service
        .global_pdf(&user.email, &range, Utc::now())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"relatorio-global.pdf\"",
            ),
        ],
        bytes,
    ))
}
