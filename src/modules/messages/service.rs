//! Direct messages between users and role-based chat groups.

use std::collections::BTreeMap;

use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::messages::{
    CHAT_SUBJECT, ChatGroup, Contact, ConversationSummary, GroupMessage, Message,
    PostGroupMessageDto, SendMessageDto, reply_subject,
};
use schoolhub_observability::track_message_sent;
use schoolhub_store::{Mutation, SchoolState, SchoolStore};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::utils::clock::{now_time, today};

fn push_message(
    tx: &mut Mutation<'_>,
    from: &str,
    to: String,
    subject: String,
    content: &str,
) -> Message {
    let message = Message {
        id: tx.next_id(),
        from: from.to_string(),
        to,
        subject,
        content: content.trim().to_string(),
        date: today(),
        time: now_time(),
        read: false,
    };
    tx.data.messages.push(message.clone());
    tx.audit(from, "send_message", format!("Message sent to {}", message.to));
    message
}

fn newest_first(a: &Message, b: &Message) -> std::cmp::Ordering {
    (&b.date, &b.time, b.id).cmp(&(&a.date, &a.time, a.id))
}

pub fn contact_list(state: &SchoolState, me: &str) -> Vec<Contact> {
    let mut seen = BTreeMap::new();
    for account in state.users.iter().filter(|u| u.username != me) {
        seen.entry(account.username.clone()).or_insert_with(|| Contact {
            username: account.username.clone(),
            name: account.name.clone(),
            role: account.role,
        });
    }
    seen.into_values().collect()
}

/// One row per counterpart, most recent conversation first.
pub fn conversation_list(state: &SchoolState, me: &str) -> Vec<ConversationSummary> {
    let mut threads: BTreeMap<&str, ConversationSummary> = BTreeMap::new();
    for message in state.data.messages.iter().filter(|m| m.involves(me)) {
        let unread = usize::from(message.to == me && !message.read);
        let entry = threads
            .entry(message.counterpart(me))
            .or_insert_with(|| ConversationSummary {
                contact: message.counterpart(me).to_string(),
                last_message: message.clone(),
                unread: 0,
            });
        entry.unread += unread;
        if newest_first(message, &entry.last_message).is_lt() {
            entry.last_message = message.clone();
        }
    }
    let mut list: Vec<ConversationSummary> = threads.into_values().collect();
    list.sort_by(|a, b| newest_first(&a.last_message, &b.last_message));
    list
}

pub struct MessageService;

impl MessageService {
    /// Everyone the caller can write to, one entry per username.
    pub async fn contacts(store: &SchoolStore, user: &AuthUser) -> Vec<Contact> {
        store.read(|state| contact_list(state, user.username())).await
    }

    pub async fn conversations(store: &SchoolStore, user: &AuthUser) -> Vec<ConversationSummary> {
        store
            .read(|state| conversation_list(state, user.username()))
            .await
    }

    /// Messages exchanged with `other`, oldest first. Incoming ones are
    /// marked read.
    #[instrument(skip(store, user), fields(username = %user.username()))]
    pub async fn conversation(
        store: &SchoolStore,
        user: &AuthUser,
        other: &str,
    ) -> Result<Vec<Message>, AppError> {
        let me = user.username().to_string();
        store
            .mutate(|tx| {
                for message in tx.data.messages.iter_mut() {
                    if message.from == other && message.to == me {
                        message.read = true;
                    }
                }
                let mut thread: Vec<Message> = tx
                    .data
                    .messages
                    .iter()
                    .filter(|m| m.is_between(&me, other))
                    .cloned()
                    .collect();
                thread.sort_by(|a, b| newest_first(b, a));
                Ok::<_, AppError>(thread)
            })
            .await
    }

    #[instrument(skip(store, user, dto), fields(from = %user.username(), to = %dto.to))]
    pub async fn send(
        store: &SchoolStore,
        user: &AuthUser,
        dto: SendMessageDto,
    ) -> Result<Message, AppError> {
        let message = store
            .mutate(|tx| {
                let to = dto.to.trim().to_string();
                if to == user.username() {
                    return Err(AppError::bad_request(anyhow!("You cannot message yourself")));
                }
                if tx.user_by_username(&to).is_none() {
                    return Err(AppError::not_found(anyhow!("Recipient {} not found", to)));
                }
                let subject = dto
                    .subject
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| CHAT_SUBJECT.to_string());
                Ok(push_message(tx, user.username(), to, subject, &dto.content))
            })
            .await?;
        track_message_sent("direct");
        Ok(message)
    }

    /// Reply to the other party of a message the caller can see.
    #[instrument(skip(store, user, content))]
    pub async fn reply(
        store: &SchoolStore,
        user: &AuthUser,
        message_id: RecordId,
        content: &str,
    ) -> Result<Message, AppError> {
        let me = user.username();
        let message = store
            .mutate(|tx| {
                let original = tx
                    .data
                    .messages
                    .iter()
                    .find(|m| m.id == message_id && m.involves(me))
                    .ok_or_else(|| AppError::not_found(anyhow!("Message not found")))?;
                let to = original.counterpart(me).to_string();
                let subject = reply_subject(&original.subject);
                Ok::<_, AppError>(push_message(tx, me, to, subject, content))
            })
            .await?;
        track_message_sent("reply");
        Ok(message)
    }

    /// Groups the caller's role may read.
    pub async fn groups(store: &SchoolStore, user: &AuthUser) -> Vec<ChatGroup> {
        store
            .read(|state| {
                state
                    .chat_groups
                    .values()
                    .filter(|g| g.allows(user.role()))
                    .cloned()
                    .collect()
            })
            .await
    }

    #[instrument(skip(store, user, dto))]
    pub async fn post_to_group(
        store: &SchoolStore,
        user: &AuthUser,
        group_id: &str,
        dto: PostGroupMessageDto,
    ) -> Result<GroupMessage, AppError> {
        let message = store
            .mutate(|tx| {
                let id = tx.next_id();
                let group = tx
                    .chat_groups
                    .get_mut(group_id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Chat group not found")))?;
                if !group.allows(user.role()) {
                    return Err(AppError::forbidden(format!(
                        "{}s cannot post in {}",
                        user.role().label(),
                        group.name
                    )));
                }
                group.add_member(user.username());
                let message = GroupMessage {
                    id,
                    from: user.username().to_string(),
                    from_name: user.name().to_string(),
                    content: dto.content.trim().to_string(),
                    date: today(),
                    time: now_time(),
                };
                group.messages.push(message.clone());
                let group_name = group.name.clone();
                tx.audit(
                    user.username(),
                    "group_message",
                    format!("Message posted to {}", group_name),
                );
                Ok(message)
            })
            .await?;
        track_message_sent("group");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schoolhub_auth::Session;
    use schoolhub_core::hash_password;
    use schoolhub_models::{Role, User};

    fn account(id: RecordId, username: &str, role: Role) -> User {
        User {
            id,
            role,
            name: username.to_uppercase(),
            email: format!("{}@school.com", username),
            username: username.to_string(),
            password: hash_password("Secret123"),
            phone: String::new(),
            address: String::new(),
            registered_date: Utc::now(),
            child_name: None,
            child_class: None,
        }
    }

    fn session(username: &str, role: Role) -> AuthUser {
        AuthUser(Session {
            token: "t".to_string(),
            user_id: 1,
            username: username.to_string(),
            role,
            name: username.to_uppercase(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        })
    }

    async fn store_with_users() -> SchoolStore {
        let store = SchoolStore::in_memory().await.unwrap();
        store
            .mutate(|tx| {
                tx.users.push(account(1, "wilson", Role::Teacher));
                tx.users.push(account(2, "mdoe", Role::Parent));
                tx.users.push(account(3, "mdoe", Role::Teacher));
                Ok::<_, AppError>(())
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_send_reply_and_read() {
        let store = store_with_users().await;
        let teacher = session("wilson", Role::Teacher);
        let parent = session("mdoe", Role::Parent);

        let sent = MessageService::send(
            &store,
            &teacher,
            SendMessageDto {
                to: "mdoe".to_string(),
                subject: None,
                content: "Hello".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(sent.subject, CHAT_SUBJECT);

        let summaries = MessageService::conversations(&store, &parent).await;
        let thread = summaries.iter().find(|s| s.contact == "wilson").unwrap();
        assert_eq!(thread.unread, 1);

        let reply = MessageService::reply(&store, &parent, sent.id, "Thanks").await.unwrap();
        assert_eq!(reply.to, "wilson");
        assert_eq!(reply.subject, "Re: Chat Message");
        let again = MessageService::reply(&store, &teacher, reply.id, "Welcome").await.unwrap();
        assert_eq!(again.subject, "Re: Chat Message");

        let messages = MessageService::conversation(&store, &parent, "wilson").await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, sent.id);
        let summaries = MessageService::conversations(&store, &parent).await;
        assert_eq!(summaries.iter().find(|s| s.contact == "wilson").unwrap().unread, 0);
    }

    #[tokio::test]
    async fn test_contacts_are_unique_and_exclude_self() {
        let store = store_with_users().await;
        let contacts = MessageService::contacts(&store, &session("wilson", Role::Teacher)).await;
        let names: Vec<&str> = contacts.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(names, vec!["mdoe"]);
    }

    #[tokio::test]
    async fn test_unknown_recipient() {
        let store = store_with_users().await;
        let err = MessageService::send(
            &store,
            &session("wilson", Role::Teacher),
            SendMessageDto {
                to: "ghost".to_string(),
                subject: Some("Hi".to_string()),
                content: "Boo".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parent_cannot_post_to_teachers_group() {
        let store = store_with_users().await;
        let parent = session("mdoe", Role::Parent);
        let dto = PostGroupMessageDto {
            content: "Hi".to_string(),
        };
        let err = MessageService::post_to_group(&store, &parent, "teachers", dto.clone())
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);

        let posted = MessageService::post_to_group(&store, &parent, "parents", dto).await.unwrap();
        assert_eq!(posted.from_name, "MDOE");
        let groups = MessageService::groups(&store, &parent).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].messages.len(), 1);
    }
}
