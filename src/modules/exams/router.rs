use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_exam, delete_exam, list_exams};
use crate::state::AppState;

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exams).post(create_exam))
        .route("/{id}", delete(delete_exam))
}
