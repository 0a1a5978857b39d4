use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    get_conversation, list_contacts, list_conversations, list_groups, post_group_message,
    reply_message, send_message,
};
use crate::state::AppState;

pub fn init_messages_router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/contacts", get(list_contacts))
        .route("/conversations", get(list_conversations))
        .route("/conversations/{username}", get(get_conversation))
        .route("/groups", get(list_groups))
        .route("/groups/{group_id}", post(post_group_message))
        .route("/{id}/reply", post(reply_message))
}
