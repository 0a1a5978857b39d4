use crate::docs::ApiDoc;
use crate::middleware::role::require_admin;
use crate::modules::account::init_account_router;
use crate::modules::announcements::init_announcements_router;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classes::init_classes_router;
use crate::modules::data::{init_admin_data_router, init_data_router};
use crate::modules::events::init_events_router;
use crate::modules::exams::init_exams_router;
use crate::modules::fees::init_fees_router;
use crate::modules::homework::init_homework_router;
use crate::modules::library::init_library_router;
use crate::modules::messages::init_messages_router;
use crate::modules::reports::init_reports_router;
use crate::modules::sections::init_sections_router;
use crate::modules::students::init_students_router;
use crate::modules::teachers::init_teachers_router;
use crate::modules::timetable::init_timetable_router;
use crate::modules::transport::init_transport_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use schoolhub_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .nest("/students", init_students_router())
        .nest("/teachers", init_teachers_router())
        .nest("/classes", init_classes_router())
        .nest("/fees", init_fees_router())
        .nest("/announcements", init_announcements_router())
        .nest("/events", init_events_router())
        .nest("/exams", init_exams_router())
        .nest("/transport", init_transport_router())
        .nest("/homework", init_homework_router())
        .nest("/messages", init_messages_router())
        .nest("/library", init_library_router())
        .nest("/attendance", init_attendance_router())
        .nest("/timetable", init_timetable_router())
        .nest("/account", init_account_router())
        .nest(
            "/data",
            init_data_router().merge(
                init_admin_data_router()
                    .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
            ),
        )
        .nest(
            "/reports",
            init_reports_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
}

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api_router(&state))
        .merge(init_sections_router());

    if let Some(handle) = state.metrics.clone() {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .config
                .cors
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
