use std::env;
use std::time::Duration;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Lifetime of a session from login or the last extension.
    pub timeout: Duration,
    /// How long before expiry the dashboard starts warning.
    pub warning_before: Duration,
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            warning_before: Duration::from_secs(5 * 60),
            cookie_name: "schoolhub_session".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(env_or("SESSION_TIMEOUT_SECS", 1800)),
            warning_before: Duration::from_secs(env_or("SESSION_WARNING_SECS", 300)),
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "schoolhub_session".to_string()),
        }
    }
}
