use axum::{
    Json,
    extract::{Path, State},
};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::reports::{AdminStats, Report, ReportKind};

use super::service::ReportService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/reports/stats",
    responses(
        (status = 200, description = "School-wide totals", body = AdminStats),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<AdminStats> {
    Json(ReportService::stats(&state.store).await)
}

#[utoipa::path(
    get,
    path = "/api/reports/{kind}",
    params(("kind" = String, Path, description = "attendance or grades")),
    responses(
        (status = 200, description = "Per-student values, summary and text chart", body = Report),
        (status = 400, description = "Unknown report type", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Report>, AppError> {
    let kind = kind
        .parse::<ReportKind>()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;
    Ok(Json(ReportService::report(&state.store, kind).await))
}
