use axum::{Router, routing::get};

use super::controller::{attendance_history, save_attendance};
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new().route("/", get(attendance_history).post(save_attendance))
}
