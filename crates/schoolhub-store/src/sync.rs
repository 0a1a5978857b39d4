//! Shared-copy sync.
//!
//! After every change to accounts or messages the store writes a shared
//! snapshot `{users, messages, timestamp}` under `schoolHubShared`, both to
//! the primary store and to a process-local secondary store. Other
//! processes using the same data directory pick it up on their next sync
//! and append any account (by username and role) or message (by id) they
//! do not already have. Nothing is ever overwritten or deleted by a merge.
//!
//! The shared copy lives next to the rest of the data, so this only links
//! processes on one machine. Failures are logged and otherwise ignored.

use chrono::Utc;
use schoolhub_models::User;
use schoolhub_models::messages::Message;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::keys;
use crate::state::SchoolState;
use crate::store::SchoolStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// Records appended by one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub users: usize,
    pub messages: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.messages == 0
    }
}

/// Append accounts whose (username, role) is not present yet.
pub fn merge_users(existing: &mut Vec<User>, incoming: impl IntoIterator<Item = User>) -> usize {
    let mut added = 0;
    for user in incoming {
        if !existing.iter().any(|u| u.is(&user.username, user.role)) {
            existing.push(user);
            added += 1;
        }
    }
    added
}

/// Append messages whose id is not present yet.
pub fn merge_messages(existing: &mut Vec<Message>, incoming: impl IntoIterator<Item = Message>) -> usize {
    let mut added = 0;
    for message in incoming {
        if !existing.iter().any(|m| m.id == message.id) {
            existing.push(message);
            added += 1;
        }
    }
    added
}

impl SchoolStore {
    pub(crate) async fn write_shared(&self, state: &SchoolState) {
        let snapshot = SharedSnapshot {
            users: state.users.clone(),
            messages: state.data.messages.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let raw = match serde_json::to_string(&snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Sync failed: could not encode shared snapshot");
                return;
            }
        };

        if let Err(e) = self.session_kv().set(keys::SHARED, raw.clone()).await {
            debug!(error = %e, "Secondary shared copy not written");
        }

        if let Err(e) = self.kv().set(keys::SHARED, raw).await {
            warn!(error = %e, "Sync failed, saving users under a fallback key");
            let key = keys::shared_users_key(snapshot.timestamp);
            let users = match serde_json::to_string(&snapshot.users) {
                Ok(users) => users,
                Err(_) => return,
            };
            if self.kv().set(&key, users.clone()).await.is_err() {
                if let Err(e) = self.session_kv().set(&key, users).await {
                    warn!(error = %e, "Fallback user copy not written");
                }
            }
        }
    }

    /// Publish the current accounts and messages to the shared key.
    pub async fn sync_to_shared(&self) {
        let state = self.snapshot().await;
        self.write_shared(&state).await;
    }

    async fn read_shared(&self) -> Option<SharedSnapshot> {
        let raw = match self.kv().get(keys::SHARED).await {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Sync failed reading the shared copy");
                None
            }
        };
        let raw = match raw {
            Some(raw) => raw,
            None => self.session_kv().get(keys::SHARED).await.ok().flatten()?,
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Sync failed: shared copy could not be decoded");
                None
            }
        }
    }

    /// Append accounts and messages found in the shared copy. Never fails;
    /// problems are logged and an empty report returned.
    pub async fn sync_from_shared(&self) -> SyncReport {
        let Some(shared) = self.read_shared().await else {
            return SyncReport::default();
        };

        let floor = shared
            .users
            .iter()
            .map(|u| u.id)
            .chain(shared.messages.iter().map(|m| m.id))
            .max()
            .unwrap_or(0);

        let result = self
            .apply(
                |tx| {
                    let users = merge_users(&mut tx.users, shared.users);
                    let messages = merge_messages(&mut tx.data.messages, shared.messages);
                    Ok::<_, StoreError>(SyncReport { users, messages })
                },
                false,
            )
            .await;

        match result {
            Ok(report) => {
                self.ids().observe(floor);
                if !report.is_empty() {
                    info!(users = report.users, messages = report.messages, "Merged shared records");
                }
                report
            }
            Err(e) => {
                warn!(error = %e, "Sync failed while saving merged records");
                SyncReport::default()
            }
        }
    }

    /// Merge and remove user copies left under `SHARED_USERS_<millis>` when
    /// the shared key could not be written. Returns accounts added.
    pub async fn merge_legacy_shared_users(&self) -> usize {
        let mut found: Vec<(bool, String, Vec<User>)> = Vec::new();
        for (primary, kv) in [(true, self.kv()), (false, self.session_kv())] {
            let keys = match kv.keys(keys::SHARED_USERS_PREFIX).await {
                Ok(keys) => keys,
                Err(e) => {
                    warn!(error = %e, "Could not list fallback user copies");
                    continue;
                }
            };
            for key in keys {
                match kv.get(&key).await.ok().flatten().map(|raw| serde_json::from_str::<Vec<User>>(&raw)) {
                    Some(Ok(users)) => found.push((primary, key, users)),
                    Some(Err(e)) => warn!(key = %key, error = %e, "Skipping unreadable fallback copy"),
                    None => {}
                }
            }
        }
        if found.is_empty() {
            return 0;
        }

        let incoming: Vec<User> = found.iter().flat_map(|(_, _, users)| users.clone()).collect();
        if let Some(max) = incoming.iter().map(|u| u.id).max() {
            self.ids().observe(max);
        }
        let result = self
            .apply(
                |tx| Ok::<_, StoreError>(merge_users(&mut tx.users, incoming)),
                false,
            )
            .await;

        match result {
            Ok(added) => {
                for (primary, key, _) in &found {
                    let kv = if *primary { self.kv() } else { self.session_kv() };
                    if let Err(e) = kv.remove(key).await {
                        debug!(key = %key, error = %e, "Fallback copy not removed");
                    }
                }
                if added > 0 {
                    info!(added, "Merged fallback user copies");
                }
                added
            }
            Err(e) => {
                warn!(error = %e, "Sync failed while saving fallback users");
                0
            }
        }
    }
}
