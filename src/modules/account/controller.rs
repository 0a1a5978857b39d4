use axum::{Json, extract::State, response::Response};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::audit::AuditEntry;
use schoolhub_models::users::{ChangePasswordDto, UpdateAccountDto, UserProfile};
use tracing::instrument;

use super::service::AccountService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::utils::attachment::json_attachment;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/account",
    responses(
        (status = 200, description = "The caller's profile", body = UserProfile),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(AccountService::profile(&state.store, &user).await?))
}

#[utoipa::path(
    put,
    path = "/api/account",
    request_body = UpdateAccountDto,
    responses(
        (status = 200, description = "Account updated", body = UserProfile),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
#[instrument(skip(state, user, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateAccountDto>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = AccountService::update(&state.store, &state.sessions, &user, dto).await?;
    state.persist_sessions().await;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/account/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 422, description = "Weak or mismatched new password", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
#[instrument(skip(state, user, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    AccountService::change_password(&state.store, &user, dto).await?;
    Ok(Json(MessageResponse::new("Password updated successfully!")))
}

#[utoipa::path(
    get,
    path = "/api/account/activity",
    responses((status = 200, description = "The caller's last ten audit entries", body = Vec<AuditEntry>)),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_activity(State(state): State<AppState>, user: AuthUser) -> Json<Vec<AuditEntry>> {
    Json(AccountService::activity(&state.store, &user).await)
}

#[utoipa::path(
    get,
    path = "/api/account/export",
    responses((status = 200, description = "<username>_account_data.json attachment", content_type = "application/json")),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
#[instrument(skip(state, user))]
pub async fn export_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let export = AccountService::export(&state.store, &user).await?;
    json_attachment(&export.file_name(), &export)
}
