use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::classes::{ClassSummary, CreateClassDto};
use tracing::instrument;

use super::service::ClassService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Classes with their student counts. Teachers get their own classes.
#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "Classes", body = Vec<ClassSummary>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn list_classes(State(state): State<AppState>, user: AuthUser) -> Json<Vec<ClassSummary>> {
    Json(ClassService::list(&state.store, user.role(), user.username()).await)
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class added", body = ClassSummary),
        (status = 409, description = "Class already exists", body = ErrorResponse),
        (status = 422, description = "Blank class name", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassSummary>), AppError> {
    let class = ClassService::create(&state.store, admin.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{name}",
    params(("name" = String, Path, description = "Class name")),
    responses(
        (status = 204, description = "Class removed"),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, admin))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    ClassService::delete(&state.store, admin.username(), &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
