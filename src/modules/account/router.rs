use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    change_password, export_account, get_activity, get_profile, update_profile,
};
use crate::state::AppState;

pub fn init_account_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/password", post(change_password))
        .route("/activity", get(get_activity))
        .route("/export", get(export_account))
}
