use axum::{Router, routing::get};

use super::controller::{export_timetable, get_timetable, save_timetable};
use crate::state::AppState;

pub fn init_timetable_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_timetable).put(save_timetable))
        .route("/export", get(export_timetable))
}
