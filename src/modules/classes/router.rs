use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_class, delete_class, list_classes};
use crate::state::AppState;

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/{name}", delete(delete_class))
}
