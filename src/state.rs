use std::sync::Arc;

use chrono::Duration;
use schoolhub_auth::{Session, SessionStore};
use schoolhub_config::{AppConfig, SessionConfig};
use schoolhub_observability::PrometheusHandle;
use schoolhub_store::keys::CURRENT_USER;
use schoolhub_store::{SchoolStore, StoreError};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SchoolStore>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("active_sessions", &self.sessions.active_count())
            .finish_non_exhaustive()
    }
}

fn session_store(config: &SessionConfig) -> SessionStore {
    let timeout = Duration::from_std(config.timeout).unwrap_or(Duration::minutes(30));
    let warning = Duration::from_std(config.warning_before).unwrap_or(Duration::minutes(5));
    SessionStore::new(timeout, warning)
}

impl AppState {
    pub fn new(store: SchoolStore, config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            sessions: Arc::new(session_store(&config.session)),
            store: Arc::new(store),
            config: Arc::new(config),
            metrics,
        }
    }

    /// Write the live sessions under `currentUser` so a restart keeps
    /// people signed in. Failures are logged, never surfaced.
    pub async fn persist_sessions(&self) {
        let sessions = self.sessions.snapshot();
        if let Err(e) = self.store.save_json(CURRENT_USER, &sessions).await {
            warn!(error = %e, "Failed to save sessions");
        }
    }

    async fn restore_sessions(&self) {
        match self.store.load_json::<Vec<Session>>(CURRENT_USER).await {
            Ok(Some(saved)) => {
                let restored = self.sessions.restore(saved);
                info!(restored, "Restored sessions");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable saved sessions"),
        }
    }
}

/// Open the data directory named by `config` and build the shared state.
pub async fn init_app_state(
    config: AppConfig,
    metrics: Option<PrometheusHandle>,
) -> Result<AppState, StoreError> {
    let store = SchoolStore::open_dir(&config.storage).await?;
    let state = AppState::new(store, config, metrics);
    state.restore_sessions().await;
    Ok(state)
}
