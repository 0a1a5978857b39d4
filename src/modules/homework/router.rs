use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{
    assign_homework, create_assignment, delete_homework, list_homework, mark_complete,
};
use crate::state::AppState;

pub fn init_homework_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_homework).post(assign_homework))
        .route("/assignments", post(create_assignment))
        .route("/{id}", delete(delete_homework))
        .route("/{id}/complete", post(mark_complete))
}
