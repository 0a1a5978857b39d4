use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_announcement, delete_announcement, list_announcements};
use crate::state::AppState;

pub fn init_announcements_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/{id}", delete(delete_announcement))
}
