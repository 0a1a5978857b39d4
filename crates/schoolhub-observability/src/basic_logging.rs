use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `schoolhub` is a target prefix, so it covers every `schoolhub_*` crate.
pub(crate) fn default_directives(level: &str) -> String {
    format!("schoolhub={},tower_http=warn,hyper=warn", level)
}

/// Console-only logging, used by the CLI and whenever observability is off.
///
/// `LOG_LEVEL` sets the level for SchoolHub crates (default `info`);
/// `RUST_LOG` overrides the whole filter.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A subscriber may already be installed (tests, repeated init).
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_all_crates() {
        let directives = default_directives("debug");
        assert_eq!(directives, "schoolhub=debug,tower_http=warn,hyper=warn");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
