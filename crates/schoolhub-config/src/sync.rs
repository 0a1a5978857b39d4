use std::time::Duration;

use crate::{env_flag, env_or};

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(3),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("SYNC_ENABLED", true),
            interval: Duration::from_secs(env_or("SYNC_INTERVAL_SECS", 3).max(1)),
        }
    }
}
