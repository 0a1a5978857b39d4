use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::messages::{
    ChatGroup, Contact, ConversationSummary, GroupMessage, Message, PostGroupMessageDto,
    ReplyMessageDto, SendMessageDto,
};
use tracing::instrument;

use super::service::MessageService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/messages/contacts",
    responses((status = 200, description = "Users the caller can message", body = Vec<Contact>)),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn list_contacts(State(state): State<AppState>, user: AuthUser) -> Json<Vec<Contact>> {
    Json(MessageService::contacts(&state.store, &user).await)
}

#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    responses((status = 200, description = "Conversations, newest first", body = Vec<ConversationSummary>)),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<ConversationSummary>> {
    Json(MessageService::conversations(&state.store, &user).await)
}

#[utoipa::path(
    get,
    path = "/api/messages/conversations/{username}",
    params(("username" = String, Path, description = "The other party")),
    responses((status = 200, description = "Messages in the order sent", body = Vec<Message>)),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = MessageService::conversation(&state.store, &user, &username).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 404, description = "Recipient not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, user, dto))]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SendMessageDto>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = MessageService::send(&state.store, &user, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    post,
    path = "/api/messages/{id}/reply",
    params(("id" = i64, Path, description = "Message being answered")),
    request_body = ReplyMessageDto,
    responses(
        (status = 201, description = "Reply sent", body = Message),
        (status = 404, description = "Message not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, user, dto))]
pub async fn reply_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<ReplyMessageDto>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = MessageService::reply(&state.store, &user, id, &dto.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages/groups",
    responses((status = 200, description = "Chat groups open to the caller's role", body = Vec<ChatGroup>)),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
pub async fn list_groups(State(state): State<AppState>, user: AuthUser) -> Json<Vec<ChatGroup>> {
    Json(MessageService::groups(&state.store, &user).await)
}

#[utoipa::path(
    post,
    path = "/api/messages/groups/{group_id}",
    params(("group_id" = String, Path, description = "Chat group id")),
    request_body = PostGroupMessageDto,
    responses(
        (status = 201, description = "Posted", body = GroupMessage),
        (status = 403, description = "Role not allowed in this group", body = ErrorResponse),
        (status = 404, description = "Chat group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Messages"
)]
#[instrument(skip(state, user, dto))]
pub async fn post_group_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(group_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<PostGroupMessageDto>,
) -> Result<(StatusCode, Json<GroupMessage>), AppError> {
    let message = MessageService::post_to_group(&state.store, &user, &group_id, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
