use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{assign_student, create_route, delete_route, list_routes};
use crate::state::AppState;

pub fn init_transport_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/{id}", delete(delete_route))
        .route("/{id}/students", post(assign_student))
}
