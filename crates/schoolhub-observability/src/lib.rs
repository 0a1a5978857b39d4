//! SchoolHub Observability
//!
//! - Console and rolling-file logging via `tracing`
//! - HTTP request logging middleware
//! - Prometheus metrics with a handful of school-specific counters
//!
//! Everything except basic console logging sits behind the default
//! `observability` feature. At runtime `OBSERVABILITY_ENABLED=false` turns
//! metrics and file logging off.
//!
//! ```no_run
//! use schoolhub_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     let _metrics = init_metrics();
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_middleware, set_active_sessions, track_login_failure,
    track_login_success, track_message_sent, track_payment_recorded, track_sync_merge,
    track_user_registered,
};

#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Stand-in for the Prometheus handle when metrics are compiled out.
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn track_user_registered(_role: &str) {}
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_message_sent(_kind: &str) {}
    pub fn track_payment_recorded(_amount: f64) {}
    pub fn track_sync_merge(_users: usize, _messages: usize) {}
    pub fn set_active_sessions(_count: usize) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
