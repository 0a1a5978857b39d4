use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::{BackupBundle, Collection};
use tracing::{instrument, warn};

use super::model::{HistoryResponse, ThemeResponse};
use super::service::DataService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::MessageResponse;
use crate::state::AppState;
use crate::utils::attachment::json_attachment;

#[utoipa::path(
    get,
    path = "/api/data/export/{collection}",
    params(("collection" = String, Path, description = "students, teachers, classes, fees, announcements, homework, messages, events, library, transport or exams")),
    responses(
        (status = 200, description = "<collection>_export.json attachment", content_type = "application/json"),
        (status = 400, description = "Unknown collection", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
#[instrument(skip(state, user))]
pub async fn export_collection(
    State(state): State<AppState>,
    user: AuthUser,
    Path(collection): Path<String>,
) -> Result<Response, AppError> {
    let collection = collection
        .parse::<Collection>()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;
    let value = DataService::export(&state.store, &user, collection).await?;
    json_attachment(&collection.export_file_name(), &value)
}

#[utoipa::path(
    post,
    path = "/api/data/theme",
    responses((status = 200, description = "New theme setting", body = ThemeResponse)),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
pub async fn toggle_theme(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ThemeResponse>, AppError> {
    Ok(Json(DataService::toggle_theme(&state.store, user.username()).await?))
}

#[utoipa::path(
    get,
    path = "/api/data/backup",
    responses(
        (status = 200, description = "schoolhub_backup_<date>.json attachment", body = BackupBundle),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
#[instrument(skip(state, admin))]
pub async fn backup(State(state): State<AppState>, admin: AuthUser) -> Result<Response, AppError> {
    let bundle = DataService::backup(&state.store, admin.username()).await?;
    json_attachment(&bundle.file_name(), &bundle)
}

#[utoipa::path(
    post,
    path = "/api/data/restore",
    request_body = BackupBundle,
    responses(
        (status = 200, description = "Data replaced from the backup", body = MessageResponse),
        (status = 400, description = "Invalid backup file", body = ErrorResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
#[instrument(skip(state, admin, payload))]
pub async fn restore(
    State(state): State<AppState>,
    admin: AuthUser,
    payload: Result<Json<BackupBundle>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(bundle) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected backup upload");
        AppError::bad_request(anyhow::anyhow!("Invalid backup file!"))
    })?;
    DataService::restore(&state.store, admin.username(), bundle).await?;
    Ok(Json(MessageResponse::new("Data restored successfully!")))
}

#[utoipa::path(
    post,
    path = "/api/data/reset",
    responses(
        (status = 200, description = "School data back to defaults", body = MessageResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
#[instrument(skip(state, admin))]
pub async fn reset(
    State(state): State<AppState>,
    admin: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    DataService::reset(&state.store, admin.username()).await?;
    Ok(Json(MessageResponse::new("All data has been reset")))
}

#[utoipa::path(
    post,
    path = "/api/data/undo",
    responses(
        (status = 200, description = "History stepped back", body = HistoryResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
pub async fn undo(State(state): State<AppState>) -> Result<Json<HistoryResponse>, AppError> {
    Ok(Json(DataService::undo(&state.store).await?))
}

#[utoipa::path(
    post,
    path = "/api/data/redo",
    responses(
        (status = 200, description = "History stepped forward", body = HistoryResponse),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Data"
)]
pub async fn redo(State(state): State<AppState>) -> Result<Json<HistoryResponse>, AppError> {
    Ok(Json(DataService::redo(&state.store).await?))
}
