//! # SchoolHub Config
//!
//! Configuration structures loaded from environment variables. Every value
//! has a default, so a bare `cargo run` starts a working demo school.
//!
//! - [`server`]: bind address
//! - [`storage`]: data directory and history limits
//! - [`session`]: session lifetime and cookie name
//! - [`sync`]: shared-copy sync worker
//! - [`registration`]: admin registration code and fee defaults
//! - [`cors`]: allowed browser origins
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::AppConfig;
//!
//! let config = AppConfig::from_env();
//! println!("listening on {}", config.server.bind_address());
//! ```

pub mod cors;
pub mod registration;
pub mod server;
pub mod session;
pub mod storage;
pub mod sync;

pub use cors::CorsConfig;
pub use registration::RegistrationConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
pub use storage::StorageConfig;
pub use sync::SyncConfig;

use std::env;
use std::str::FromStr;

/// Every configuration section, loaded together at startup.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub sync: SyncConfig,
    pub registration: RegistrationConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env(),
            session: SessionConfig::from_env(),
            sync: SyncConfig::from_env(),
            registration: RegistrationConfig::from_env(),
            cors: CorsConfig::from_env(),
        }
    }
}

pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v != "false" && v != "0" && v != "no"
        })
        .unwrap_or(default)
}
