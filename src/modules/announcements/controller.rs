use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::announcements::{Announcement, CreateAnnouncementDto};
use tracing::instrument;

use super::service::AnnouncementService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/announcements",
    responses((status = 200, description = "Announcements, newest first", body = Vec<Announcement>)),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Json<Vec<Announcement>> {
    Json(AnnouncementService::list(&state.store).await)
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement posted", body = Announcement),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_announcement(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateAnnouncementDto>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    let announcement = AnnouncementService::create(&state.store, admin.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    params(("id" = i64, Path, description = "Announcement id")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 404, description = "Announcement not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
#[instrument(skip(state, admin))]
pub async fn delete_announcement(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    AnnouncementService::delete(&state.store, admin.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
