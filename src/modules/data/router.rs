use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{backup, export_collection, redo, reset, restore, toggle_theme, undo};
use crate::state::AppState;

pub fn init_data_router() -> Router<AppState> {
    Router::new()
        .route("/export/{collection}", get(export_collection))
        .route("/theme", post(toggle_theme))
}

/// Backup and history routes. Mounted behind the admin route layer.
pub fn init_admin_data_router() -> Router<AppState> {
    Router::new()
        .route("/backup", get(backup))
        .route("/restore", post(restore))
        .route("/reset", post(reset))
        .route("/undo", post(undo))
        .route("/redo", post(redo))
}
