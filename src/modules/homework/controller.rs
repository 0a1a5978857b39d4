use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::homework::{AssignHomeworkDto, CreateAssignmentDto, Homework};
use tracing::instrument;

use super::service::HomeworkService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireParent, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/homework",
    responses((status = 200, description = "Homework visible to the caller", body = Vec<Homework>)),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn list_homework(State(state): State<AppState>, user: AuthUser) -> Json<Vec<Homework>> {
    Json(HomeworkService::list(&state.store, &user).await)
}

#[utoipa::path(
    post,
    path = "/api/homework",
    request_body = AssignHomeworkDto,
    responses(
        (status = 201, description = "Homework assigned", body = Homework),
        (status = 400, description = "Unknown class", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, staff, dto))]
pub async fn assign_homework(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<AssignHomeworkDto>,
) -> Result<(StatusCode, Json<Homework>), AppError> {
    let homework = HomeworkService::assign(&state.store, staff.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(homework)))
}

#[utoipa::path(
    post,
    path = "/api/homework/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Homework),
        (status = 400, description = "Unknown class", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, staff, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Homework>), AppError> {
    let homework = HomeworkService::create_assignment(&state.store, &staff, dto).await?;
    Ok((StatusCode::CREATED, Json(homework)))
}

#[utoipa::path(
    post,
    path = "/api/homework/{id}/complete",
    params(("id" = i64, Path, description = "Homework id")),
    responses(
        (status = 200, description = "Marked complete", body = Homework),
        (status = 404, description = "Homework not found for the linked child", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, parent))]
pub async fn mark_complete(
    State(state): State<AppState>,
    RequireParent(parent): RequireParent,
    Path(id): Path<RecordId>,
) -> Result<Json<Homework>, AppError> {
    let homework = HomeworkService::mark_complete(&state.store, &parent, id).await?;
    Ok(Json(homework))
}

#[utoipa::path(
    delete,
    path = "/api/homework/{id}",
    params(("id" = i64, Path, description = "Homework id")),
    responses(
        (status = 204, description = "Homework deleted"),
        (status = 404, description = "Homework not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, staff))]
pub async fn delete_homework(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    HomeworkService::delete(&state.store, staff.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
