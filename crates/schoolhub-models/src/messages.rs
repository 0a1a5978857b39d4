//! Direct messages, chat groups and their DTOs.
//!
//! Messages address users by username. A conversation is every message
//! exchanged between two usernames, in the order it was sent.

use std::collections::BTreeMap;

use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::Role;

pub const CHAT_SUBJECT: &str = "Chat Message";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: RecordId,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub subject: String,
    pub content: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub read: bool,
}

impl Message {
    pub fn involves(&self, username: &str) -> bool {
        self.from == username || self.to == username
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The other party of a message seen from `username`.
    pub fn counterpart(&self, username: &str) -> &str {
        if self.from == username {
            &self.to
        } else {
            &self.from
        }
    }

    pub fn sent_at(&self) -> (&str, &str) {
        (&self.date, &self.time)
    }
}

/// "Re: " is added once; replying to a reply keeps a single prefix.
pub fn reply_subject(subject: &str) -> String {
    if subject.starts_with("Re: ") {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SendMessageDto {
    /// Recipient username.
    #[validate(length(min = 1, message = "Recipient is required"))]
    pub to: String,
    /// Defaults to "Chat Message".
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ReplyMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Contact {
    pub username: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationSummary {
    pub contact: String,
    pub last_message: Message,
    pub unread: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessage {
    pub id: RecordId,
    pub from: String,
    pub from_name: String,
    pub content: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatGroup {
    pub id: String,
    pub name: String,
    /// Usernames of the members.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub messages: Vec<GroupMessage>,
    pub allowed_roles: Vec<Role>,
}

impl ChatGroup {
    fn new(id: &str, name: &str, allowed_roles: Vec<Role>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            members: Vec::new(),
            messages: Vec::new(),
            allowed_roles,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    /// Adds the username once. Returns whether it was newly added.
    pub fn add_member(&mut self, username: &str) -> bool {
        if self.members.iter().any(|m| m == username) {
            return false;
        }
        self.members.push(username.to_string());
        true
    }
}

pub type ChatGroups = BTreeMap<String, ChatGroup>;

pub fn default_chat_groups() -> ChatGroups {
    [
        ChatGroup::new("teachers", "Teachers Group", vec![Role::Teacher, Role::Admin]),
        ChatGroup::new(
            "parents",
            "Parents & Teachers",
            vec![Role::Parent, Role::Teacher, Role::Admin],
        ),
        ChatGroup::new("admin", "Admin & Teachers", vec![Role::Admin, Role::Teacher]),
    ]
    .into_iter()
    .map(|group| (group.id.clone(), group))
    .collect()
}

/// Groups a newly registered or signed-in user joins.
pub fn groups_for_role(role: Role) -> &'static [&'static str] {
    match role {
        Role::Teacher => &["teachers", "parents", "admin"],
        Role::Parent => &["parents"],
        Role::Admin => &["admin", "teachers", "parents"],
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct PostGroupMessageDto {
    #[validate(length(min = 1, max = 5000, message = "Message cannot be empty"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: RecordId, from: &str, to: &str) -> Message {
        Message {
            id,
            from: from.to_string(),
            to: to.to_string(),
            subject: CHAT_SUBJECT.to_string(),
            content: "hi".to_string(),
            date: "2024-01-10".to_string(),
            time: "10:00".to_string(),
            read: false,
        }
    }

    #[test]
    fn test_reply_subject_prefixes_once() {
        assert_eq!(reply_subject("Progress"), "Re: Progress");
        assert_eq!(reply_subject("Re: Progress"), "Re: Progress");
    }

    #[test]
    fn test_message_parties() {
        let m = message(1, "wilson", "mdoe");
        assert!(m.involves("wilson"));
        assert!(m.is_between("mdoe", "wilson"));
        assert!(!m.is_between("mdoe", "admin"));
        assert_eq!(m.counterpart("wilson"), "mdoe");
        assert_eq!(m.counterpart("mdoe"), "wilson");
    }

    #[test]
    fn test_default_groups_and_membership() {
        let groups = default_chat_groups();
        assert_eq!(groups.len(), 3);
        assert!(groups["parents"].allows(Role::Parent));
        assert!(!groups["teachers"].allows(Role::Parent));
        for role in [Role::Admin, Role::Teacher, Role::Parent] {
            for id in groups_for_role(role) {
                assert!(groups[*id].allows(role), "{} may not join {}", role, id);
            }
        }
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut groups = default_chat_groups();
        let group = groups.get_mut("parents").unwrap();
        assert!(group.add_member("mdoe"));
        assert!(!group.add_member("mdoe"));
        assert_eq!(group.members, vec!["mdoe"]);
    }

    #[test]
    fn test_legacy_message_without_time() {
        let json = r#"{"id":1,"from":"Teacher","to":"Parent","subject":"Progress Update","content":"Good progress","date":"2024-01-10","read":false}"#;
        let m: Message = serde_json::from_str(json).unwrap();
        assert_eq!(m.time, "");
        assert_eq!(m.sent_at(), ("2024-01-10", ""));
    }
}
