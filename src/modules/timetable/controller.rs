use axum::{Json, extract::State, response::Response};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::timetable::{Timetable, TimetableRow};
use tracing::instrument;

use super::service::{EXPORT_FILE_NAME, TimetableService};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::state::AppState;
use crate::utils::attachment::json_attachment;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/timetable",
    responses((status = 200, description = "Weekly grid, one row per time slot", body = Vec<TimetableRow>)),
    security(("bearer_auth" = [])),
    tag = "Timetable"
)]
pub async fn get_timetable(State(state): State<AppState>, _user: AuthUser) -> Json<Timetable> {
    Json(TimetableService::get(&state.store).await)
}

#[utoipa::path(
    put,
    path = "/api/timetable",
    request_body = Vec<TimetableRow>,
    responses(
        (status = 200, description = "Timetable saved", body = Vec<TimetableRow>),
        (status = 400, description = "Row without a time slot", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Timetable"
)]
#[instrument(skip(state, staff, timetable))]
pub async fn save_timetable(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(timetable): ValidatedJson<Timetable>,
) -> Result<Json<Timetable>, AppError> {
    let saved = TimetableService::save(&state.store, staff.username(), timetable).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/api/timetable/export",
    responses((status = 200, description = "timetable_export.json attachment", content_type = "application/json")),
    security(("bearer_auth" = [])),
    tag = "Timetable"
)]
pub async fn export_timetable(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, AppError> {
    let timetable = TimetableService::get(&state.store).await;
    json_attachment(EXPORT_FILE_NAME, &timetable)
}
