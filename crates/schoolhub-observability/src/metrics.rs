use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::warn;

use crate::logging::is_observability_enabled;

/// Install the Prometheus recorder and its upkeep task. `None` when
/// observability is off or a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )
        .map_err(|e| warn!(error = %e, "Invalid histogram buckets"))
        .ok()?;
    let handle = builder
        .install_recorder()
        .map_err(|e| warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_active").decrement(1.0);

    let status = response.status().as_u16();
    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

pub fn track_user_registered(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total", "role" => role.to_string()).increment(1);
}

pub fn track_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "failure", "reason" => reason.to_string()).increment(1);
}

/// `kind` is "direct" or "group".
pub fn track_message_sent(kind: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("messages_sent_total", "kind" => kind.to_string()).increment(1);
}

pub fn track_payment_recorded(amount: f64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("fee_payments_total").increment(1);
    histogram!("fee_payment_amount").record(amount);
}

pub fn track_sync_merge(users: usize, messages: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sync_merged_records_total", "kind" => "user").increment(users as u64);
    counter!("sync_merged_records_total", "kind" => "message").increment(messages as u64);
}

pub fn set_active_sessions(count: usize) {
    if !is_observability_enabled() {
        return;
    }
    gauge!("active_sessions").set(count as f64);
}
