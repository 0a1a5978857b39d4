use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{extend_session, login_user, logout_user, register_user, session_status};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/session", get(session_status))
        .route("/session/extend", post(extend_session))
}
