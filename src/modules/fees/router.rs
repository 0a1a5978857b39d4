use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{fee_summary, pay_fees, record_payment};
use crate::state::AppState;

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(fee_summary))
        .route("/pay", post(pay_fees))
        .route("/{student_id}/payments", post(record_payment))
}
