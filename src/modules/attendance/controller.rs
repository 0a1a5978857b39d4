use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::attendance::{AttendanceRecord, SaveAttendanceDto};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use super::service::AttendanceService;
use crate::middleware::role::RequireStaff;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AttendanceHistoryParams {
    /// Only registers for this class.
    pub class: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = SaveAttendanceDto,
    responses(
        (status = 201, description = "Register saved", body = AttendanceRecord),
        (status = 400, description = "Unknown class or student outside the class", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, staff, dto))]
pub async fn save_attendance(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<SaveAttendanceDto>,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let record = AttendanceService::save(&state.store, &staff, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceHistoryParams),
    responses((status = 200, description = "Saved registers, newest first", body = Vec<AttendanceRecord>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_history(
    State(state): State<AppState>,
    _staff: RequireStaff,
    Query(params): Query<AttendanceHistoryParams>,
) -> Json<Vec<AttendanceRecord>> {
    Json(AttendanceService::history(&state.store, params.class.as_deref()).await)
}
