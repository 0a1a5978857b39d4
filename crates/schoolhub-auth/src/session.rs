//! In-memory sessions with an inactivity timeout.
//!
//! A session expires `timeout` after its last activity. Every authenticated
//! request counts as activity; [`SessionStore::extend`] is the explicit
//! "stay signed in" action offered once the session enters its warning
//! window.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use schoolhub_core::RecordId;
use schoolhub_models::{Role, User};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::token::generate_session_token;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: RecordId,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub login_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(user: &User) -> Self {
        let now = Utc::now();
        Self {
            token: generate_session_token(),
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
            login_time: now,
            last_activity: now,
        }
    }

    pub fn expires_at(&self, timeout: Duration) -> DateTime<Utc> {
        self.last_activity + timeout
    }

    pub fn is_expired(&self, timeout: Duration, now: DateTime<Utc>) -> bool {
        now >= self.expires_at(timeout)
    }

    /// True inside the last `warning_before` of the session's life.
    pub fn needs_warning(&self, timeout: Duration, warning_before: Duration, now: DateTime<Utc>) -> bool {
        !self.is_expired(timeout, now) && self.expires_at(timeout) - now <= warning_before
    }

    pub fn extend(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

/// Remaining lifetime of a session as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionStatus {
    pub username: String,
    pub role: Role,
    pub name: String,
    pub expires_at: DateTime<Utc>,
    pub remaining_secs: i64,
    pub warning: bool,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    timeout: Duration,
    warning_before: Duration,
}

impl SessionStore {
    pub fn new(timeout: Duration, warning_before: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
            warning_before,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self, user: &User) -> Session {
        let session = Session::new(user);
        self.write().insert(session.token.clone(), session.clone());
        debug!(username = %session.username, role = %session.role, "Session created");
        session
    }

    /// Look up a live session and record activity on it. Expired sessions
    /// are dropped and resolve to `None`.
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        let mut sessions = self.write();
        let session = sessions.get_mut(token)?;
        if session.is_expired(self.timeout, now) {
            sessions.remove(token);
            return None;
        }
        session.extend(now);
        Some(session.clone())
    }

    /// Look up a live session without counting it as activity.
    pub fn peek(&self, token: &str) -> Option<Session> {
        let now = Utc::now();
        self.read()
            .get(token)
            .filter(|s| !s.is_expired(self.timeout, now))
            .cloned()
    }

    pub fn status(&self, token: &str) -> Option<SessionStatus> {
        let now = Utc::now();
        let session = self.peek(token)?;
        let expires_at = session.expires_at(self.timeout);
        Some(SessionStatus {
            warning: session.needs_warning(self.timeout, self.warning_before, now),
            remaining_secs: (expires_at - now).num_seconds().max(0),
            expires_at,
            username: session.username,
            role: session.role,
            name: session.name,
        })
    }

    pub fn extend(&self, token: &str) -> Option<Session> {
        self.resolve(token)
    }

    pub fn revoke(&self, token: &str) -> Option<Session> {
        self.write().remove(token)
    }

    /// Refresh the display name on every session of an account.
    pub fn rename(&self, user_id: RecordId, name: &str) {
        for session in self.write().values_mut().filter(|s| s.user_id == user_id) {
            session.name = name.to_string();
        }
    }

    /// Drop expired sessions, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.timeout, now));
        before - sessions.len()
    }

    pub fn active_count(&self) -> usize {
        let now = Utc::now();
        self.read()
            .values()
            .filter(|s| !s.is_expired(self.timeout, now))
            .count()
    }

    /// Live sessions, newest sign-in first.
    pub fn snapshot(&self) -> Vec<Session> {
        let now = Utc::now();
        let mut sessions: Vec<Session> = self
            .read()
            .values()
            .filter(|s| !s.is_expired(self.timeout, now))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.login_time.cmp(&a.login_time));
        sessions
    }

    /// Re-admit sessions saved by a previous run, skipping expired ones.
    pub fn restore(&self, saved: Vec<Session>) -> usize {
        let now = Utc::now();
        let mut sessions = self.write();
        let mut restored = 0;
        for session in saved {
            if !session.is_expired(self.timeout, now) {
                sessions.insert(session.token.clone(), session);
                restored += 1;
            }
        }
        restored
    }

    #[cfg(test)]
    fn backdate(&self, token: &str, by: Duration) {
        if let Some(session) = self.write().get_mut(token) {
            session.last_activity -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            role: Role::Teacher,
            name: "Mr. Wilson".to_string(),
            email: "wilson@school.com".to_string(),
            username: "wilson".to_string(),
            password: String::new(),
            phone: String::new(),
            address: String::new(),
            registered_date: Utc::now(),
            child_name: None,
            child_class: None,
        }
    }

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(30), Duration::minutes(5))
    }

    #[test]
    fn test_create_and_resolve() {
        let sessions = store();
        let session = sessions.create(&user());
        let resolved = sessions.resolve(&session.token).unwrap();
        assert_eq!(resolved.username, "wilson");
        assert_eq!(resolved.role, Role::Teacher);
        assert_eq!(sessions.active_count(), 1);
        assert!(sessions.resolve("missing").is_none());
    }

    #[test]
    fn test_expired_session_does_not_resolve() {
        let sessions = store();
        let session = sessions.create(&user());
        sessions.backdate(&session.token, Duration::minutes(31));
        assert!(sessions.peek(&session.token).is_none());
        assert!(sessions.resolve(&session.token).is_none());
        assert_eq!(sessions.active_count(), 0);
    }

    #[test]
    fn test_warning_window() {
        let sessions = store();
        let session = sessions.create(&user());
        assert!(!sessions.status(&session.token).unwrap().warning);

        sessions.backdate(&session.token, Duration::minutes(26));
        let status = sessions.status(&session.token).unwrap();
        assert!(status.warning);
        assert!(status.remaining_secs <= 4 * 60);

        sessions.extend(&session.token).unwrap();
        assert!(!sessions.status(&session.token).unwrap().warning);
    }

    #[test]
    fn test_peek_does_not_refresh() {
        let sessions = store();
        let session = sessions.create(&user());
        sessions.backdate(&session.token, Duration::minutes(10));
        let before = sessions.peek(&session.token).unwrap().last_activity;
        assert_eq!(sessions.peek(&session.token).unwrap().last_activity, before);
        assert!(sessions.resolve(&session.token).unwrap().last_activity > before);
    }

    #[test]
    fn test_revoke_and_sweep() {
        let sessions = store();
        let a = sessions.create(&user());
        let b = sessions.create(&user());
        let c = sessions.create(&user());
        assert!(sessions.revoke(&a.token).is_some());
        assert!(sessions.revoke(&a.token).is_none());

        sessions.backdate(&b.token, Duration::hours(1));
        assert_eq!(sessions.sweep(), 1);
        assert_eq!(sessions.active_count(), 1);
        assert!(sessions.peek(&c.token).is_some());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let sessions = store();
        let live = sessions.create(&user());
        let stale = sessions.create(&user());
        let mut saved = sessions.snapshot();
        assert_eq!(saved.len(), 2);
        saved
            .iter_mut()
            .filter(|s| s.token == stale.token)
            .for_each(|s| s.last_activity -= Duration::hours(2));

        let json = serde_json::to_string(&saved).unwrap();
        let saved: Vec<Session> = serde_json::from_str(&json).unwrap();

        let restored = store();
        assert_eq!(restored.restore(saved), 1);
        assert!(restored.peek(&live.token).is_some());
    }

    #[test]
    fn test_rename() {
        let sessions = store();
        let session = sessions.create(&user());
        sessions.rename(42, "Dr. Wilson");
        assert_eq!(sessions.peek(&session.token).unwrap().name, "Dr. Wilson");
    }
}
