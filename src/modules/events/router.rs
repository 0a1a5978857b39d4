use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_event, delete_event, list_events};
use crate::state::AppState;

pub fn init_events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", delete(delete_event))
}
