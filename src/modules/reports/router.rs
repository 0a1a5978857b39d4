use axum::{Router, routing::get};

use super::controller::{get_report, get_stats};
use crate::state::AppState;

/// Mounted behind the admin route layer.
pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/{kind}", get(get_report))
}
