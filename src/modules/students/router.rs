use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    bulk_class_edit, bulk_delete_students, class_roster, create_student, delete_student,
    get_student, list_students, update_marks, update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/bulk-delete", post(bulk_delete_students))
        .route("/class/{class_name}", get(class_roster).put(bulk_class_edit))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/marks", put(update_marks))
}
