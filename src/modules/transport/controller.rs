use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::transport::{AssignRouteStudentDto, CreateRouteDto, TransportRoute};
use tracing::instrument;

use super::service::TransportService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/transport",
    responses((status = 200, description = "Bus routes", body = Vec<TransportRoute>)),
    security(("bearer_auth" = [])),
    tag = "Transport"
)]
pub async fn list_routes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<Vec<TransportRoute>> {
    Json(TransportService::list(&state.store).await)
}

#[utoipa::path(
    post,
    path = "/api/transport",
    request_body = CreateRouteDto,
    responses(
        (status = 201, description = "Route added", body = TransportRoute),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transport"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_route(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateRouteDto>,
) -> Result<(StatusCode, Json<TransportRoute>), AppError> {
    let route = TransportService::create(&state.store, admin.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

#[utoipa::path(
    delete,
    path = "/api/transport/{id}",
    params(("id" = i64, Path, description = "Route id")),
    responses(
        (status = 204, description = "Route deleted"),
        (status = 404, description = "Route not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transport"
)]
#[instrument(skip(state, admin))]
pub async fn delete_route(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    TransportService::delete(&state.store, admin.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/transport/{id}/students",
    params(("id" = i64, Path, description = "Route id")),
    request_body = AssignRouteStudentDto,
    responses(
        (status = 200, description = "Student assigned", body = TransportRoute),
        (status = 400, description = "Route is full", body = ErrorResponse),
        (status = 404, description = "Route or student not found", body = ErrorResponse),
        (status = 409, description = "Student already on route", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transport"
)]
#[instrument(skip(state, admin, dto))]
pub async fn assign_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<AssignRouteStudentDto>,
) -> Result<Json<TransportRoute>, AppError> {
    let route =
        TransportService::assign_student(&state.store, admin.username(), id, dto.student_id).await?;
    Ok(Json(route))
}
