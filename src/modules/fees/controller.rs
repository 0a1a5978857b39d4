use axum::{
    Json,
    extract::{Path, State},
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::students::RecordPaymentDto;
use tracing::instrument;

use super::model::{FeeSummary, PaymentReceipt};
use super::service::FeeService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireParent};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/fees",
    responses(
        (status = 200, description = "Fee status and totals", body = FeeSummary),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
pub async fn fee_summary(State(state): State<AppState>, user: AuthUser) -> Json<FeeSummary> {
    Json(FeeService::summary(&state.store, &user).await)
}

#[utoipa::path(
    post,
    path = "/api/fees/{student_id}/payments",
    params(("student_id" = i64, Path, description = "Student id")),
    request_body = RecordPaymentDto,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentReceipt),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Amount must be positive", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, admin, dto))]
pub async fn record_payment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(student_id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<RecordPaymentDto>,
) -> Result<Json<PaymentReceipt>, AppError> {
    let receipt =
        FeeService::record_payment(&state.store, admin.username(), student_id, dto.amount).await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    post,
    path = "/api/fees/pay",
    request_body = RecordPaymentDto,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentReceipt),
        (status = 403, description = "Parents only", body = ErrorResponse),
        (status = 404, description = "No linked child", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, parent, dto))]
pub async fn pay_fees(
    State(state): State<AppState>,
    RequireParent(parent): RequireParent,
    ValidatedJson(dto): ValidatedJson<RecordPaymentDto>,
) -> Result<Json<PaymentReceipt>, AppError> {
    let receipt = FeeService::pay_own_child(&state.store, &parent, dto.amount).await?;
    Ok(Json(receipt))
}
