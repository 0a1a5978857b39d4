use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::events::{CreateEventDto, Event};
use tracing::instrument;

use super::service::EventService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "Events in calendar order", body = Vec<Event>)),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn list_events(State(state): State<AppState>, _user: AuthUser) -> Json<Vec<Event>> {
    Json(EventService::list(&state.store).await)
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event scheduled", body = Event),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, staff, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = EventService::create(&state.store, staff.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, admin))]
pub async fn delete_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    EventService::delete(&state.store, admin.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
