//! Background sync between the private store and the shared area.
//!
//! Every tick the worker drops expired sessions, and while at least one
//! session is live it merges in accounts and messages other instances have
//! published. Publishing happens in the store itself after each change.

use schoolhub_observability::{set_active_sessions, track_sync_merge};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::state::AppState;

/// Run one sync pass. Returns true when anything was merged in.
pub async fn sync_once(state: &AppState) -> bool {
    let expired = state.sessions.sweep();
    if expired > 0 {
        info!(expired, "Dropped expired sessions");
        state.persist_sessions().await;
    }

    let active = state.sessions.active_count();
    set_active_sessions(active);
    if active == 0 {
        return false;
    }

    let report = state.store.sync_from_shared().await;
    if report.is_empty() {
        debug!("Shared area already in step");
        return false;
    }
    track_sync_merge(report.users, report.messages);
    true
}

/// Spawn the sync loop. It stops when `shutdown` flips to true.
pub fn spawn_sync_worker(state: AppState, mut shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
    let config = state.config.sync.clone();
    if !config.enabled {
        info!("Background sync disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let merged = state.store.merge_legacy_shared_users().await;
        if merged > 0 {
            info!(merged, "Imported users from legacy shared keys");
        }

        let mut ticker = interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = config.interval.as_secs(), "Background sync started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    sync_once(&state).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Background sync stopped");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_config::AppConfig;
    use chrono::Utc;
    use schoolhub_models::{Role, User};
    use schoolhub_store::SchoolStore;

    #[tokio::test]
    async fn test_sync_is_idle_without_sessions() {
        let store = SchoolStore::in_memory().await.unwrap();
        let state = AppState::new(store, AppConfig::default(), None);
        assert!(!sync_once(&state).await);
    }

    #[tokio::test]
    async fn test_sync_runs_with_a_session() {
        let store = SchoolStore::in_memory().await.unwrap();
        let state = AppState::new(store, AppConfig::default(), None);
        let admin = User {
            id: 1,
            role: Role::Admin,
            name: "Admin".to_string(),
            email: "admin@school.com".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            phone: String::new(),
            address: String::new(),
            registered_date: Utc::now(),
            child_name: None,
            child_class: None,
        };
        state.sessions.create(&admin);
        // Nothing foreign in the shared area yet, so nothing to merge.
        assert!(!sync_once(&state).await);
        assert_eq!(state.sessions.active_count(), 1);
    }

    #[tokio::test]
    async fn test_worker_stops_on_shutdown() {
        let store = SchoolStore::in_memory().await.unwrap();
        let state = AppState::new(store, AppConfig::default(), None);
        let (tx, rx) = watch::channel(false);
        let handle = spawn_sync_worker(state, rx).expect("sync enabled by default");
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
