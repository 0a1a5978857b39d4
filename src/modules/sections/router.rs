use axum::{Router, routing::get};

use super::controller::{
    home, print_collection, print_timetable, show_certificate, show_login, show_register,
    show_section,
};
use crate::state::AppState;

/// Browser pages. Mounted at the root, outside `/api`.
pub fn init_sections_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(show_login))
        .route("/register", get(show_register))
        .route("/app/print/{collection}", get(print_collection))
        .route("/app/certificates/{id}", get(show_certificate))
        .route("/app/timetable/print", get(print_timetable))
        .route("/app/{section}", get(show_section))
}
