//! Everything the store persists, one field per storage key.

use chrono::Utc;
use schoolhub_core::{IdGenerator, RecordId};
use schoolhub_models::attendance::AttendanceRecord;
use schoolhub_models::audit::{AuditEntry, LOCAL_IP};
use schoolhub_models::library::{DocumentRecord, StudyMaterial, Syllabus};
use schoolhub_models::messages::{ChatGroups, default_chat_groups, groups_for_role};
use schoolhub_models::timetable::Timetable;
use schoolhub_models::{Role, SchoolData, User};

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolState {
    pub data: SchoolData,
    pub users: Vec<User>,
    pub chat_groups: ChatGroups,
    pub audit_log: Vec<AuditEntry>,
    pub study_materials: Vec<StudyMaterial>,
    pub documents: Vec<DocumentRecord>,
    pub syllabi: Vec<Syllabus>,
    pub attendance_history: Vec<AttendanceRecord>,
    pub timetable: Timetable,
    pub dark_mode: bool,
}

impl Default for SchoolState {
    fn default() -> Self {
        Self {
            data: SchoolData::default_dataset(),
            users: Vec::new(),
            chat_groups: default_chat_groups(),
            audit_log: Vec::new(),
            study_materials: Vec::new(),
            documents: Vec::new(),
            syllabi: Vec::new(),
            attendance_history: Vec::new(),
            timetable: Timetable::default(),
            dark_mode: false,
        }
    }
}

impl SchoolState {
    pub fn user(&self, username: &str, role: Role) -> Option<&User> {
        self.users.iter().find(|u| u.is(username, role))
    }

    pub fn user_by_id(&self, id: RecordId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_id_mut(&mut self, id: RecordId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// First account with this username under any role.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Add `username` to every group its role may join.
    pub fn join_chat_groups(&mut self, username: &str, role: Role) {
        for id in groups_for_role(role) {
            if let Some(group) = self.chat_groups.get_mut(*id) {
                if group.allows(role) {
                    group.add_member(username);
                }
            }
        }
    }

    /// Append an audit entry, keeping only the newest `limit`.
    pub fn push_audit(&mut self, entry: AuditEntry, limit: usize) {
        self.audit_log.push(entry);
        if self.audit_log.len() > limit {
            let excess = self.audit_log.len() - limit;
            self.audit_log.drain(..excess);
        }
    }

    /// The newest `limit` entries recorded for `username`, oldest first.
    pub fn recent_activity(&self, username: &str, limit: usize) -> Vec<AuditEntry> {
        let mine: Vec<&AuditEntry> = self.audit_log.iter().filter(|e| e.user == username).collect();
        let skip = mine.len().saturating_sub(limit);
        mine.into_iter().skip(skip).cloned().collect()
    }

    pub(crate) fn max_record_id(&self) -> RecordId {
        let ids = self
            .users
            .iter()
            .map(|r| r.id)
            .chain(self.audit_log.iter().map(|r| r.id))
            .chain(self.study_materials.iter().map(|r| r.id))
            .chain(self.documents.iter().map(|r| r.id))
            .chain(self.syllabi.iter().map(|r| r.id))
            .chain(
                self.chat_groups
                    .values()
                    .flat_map(|g| g.messages.iter().map(|m| m.id)),
            );
        ids.max().unwrap_or(0).max(self.data.max_record_id())
    }
}

/// Write access handed to [`crate::SchoolStore::mutate`] closures.
pub struct Mutation<'a> {
    pub state: &'a mut SchoolState,
    ids: &'a IdGenerator,
    audit_limit: usize,
}

impl<'a> Mutation<'a> {
    pub(crate) fn new(state: &'a mut SchoolState, ids: &'a IdGenerator, audit_limit: usize) -> Self {
        Self {
            state,
            ids,
            audit_limit,
        }
    }

    pub fn next_id(&self) -> RecordId {
        self.ids.next_id()
    }

    pub fn audit(&mut self, user: &str, action: &str, details: impl Into<String>) {
        let entry = AuditEntry {
            id: self.ids.next_id(),
            timestamp: Utc::now(),
            user: user.to_string(),
            action: action.to_string(),
            details: details.into(),
            ip: LOCAL_IP.to_string(),
        };
        self.state.push_audit(entry, self.audit_limit);
    }
}

impl std::ops::Deref for Mutation<'_> {
    type Target = SchoolState;

    fn deref(&self) -> &SchoolState {
        self.state
    }
}

impl std::ops::DerefMut for Mutation<'_> {
    fn deref_mut(&mut self) -> &mut SchoolState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: RecordId, user: &str) -> AuditEntry {
        AuditEntry {
            id,
            timestamp: Utc::now(),
            user: user.to_string(),
            action: "login".to_string(),
            details: String::new(),
            ip: LOCAL_IP.to_string(),
        }
    }

    #[test]
    fn test_audit_log_is_capped() {
        let mut state = SchoolState::default();
        for id in 0..12 {
            state.push_audit(entry(id, "admin"), 10);
        }
        assert_eq!(state.audit_log.len(), 10);
        assert_eq!(state.audit_log[0].id, 2);
        assert_eq!(state.audit_log[9].id, 11);
    }

    #[test]
    fn test_recent_activity_filters_by_user() {
        let mut state = SchoolState::default();
        for id in 0..15 {
            let user = if id % 2 == 0 { "admin" } else { "wilson" };
            state.push_audit(entry(id, user), 1000);
        }
        let recent = state.recent_activity("admin", 3);
        let ids: Vec<RecordId> = recent.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 12, 14]);
    }

    #[test]
    fn test_join_chat_groups() {
        let mut state = SchoolState::default();
        state.join_chat_groups("mdoe", Role::Parent);
        state.join_chat_groups("wilson", Role::Teacher);
        assert_eq!(state.chat_groups["parents"].members, vec!["mdoe", "wilson"]);
        assert!(state.chat_groups["teachers"].members.contains(&"wilson".to_string()));
        assert!(!state.chat_groups["admin"].members.contains(&"mdoe".to_string()));
    }
}
