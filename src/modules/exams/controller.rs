use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::exams::{CreateExamDto, Exam};
use tracing::instrument;

use super::service::ExamService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/exams",
    responses((status = 200, description = "Exam schedule", body = Vec<Exam>)),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
pub async fn list_exams(State(state): State<AppState>, _user: AuthUser) -> Json<Vec<Exam>> {
    Json(ExamService::list(&state.store).await)
}

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam scheduled", body = Exam),
        (status = 400, description = "Unknown class", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, staff, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let exam = ExamService::create(&state.store, staff.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(("id" = i64, Path, description = "Exam id")),
    responses(
        (status = 204, description = "Exam cancelled"),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, admin))]
pub async fn delete_exam(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    ExamService::delete(&state.store, admin.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
