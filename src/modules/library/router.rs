use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::controller::{
    add_book, borrow_book, delete_item, download_item, edit_book, get_catalog, return_book,
    upload_document, upload_material, upload_syllabus,
};
use crate::state::AppState;

pub fn init_library_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_catalog))
        .route("/books", post(add_book))
        .route("/books/{id}", put(edit_book))
        .route("/books/{id}/borrow", post(borrow_book))
        .route("/books/{id}/return", post(return_book))
        .route("/materials", post(upload_material))
        .route("/documents", post(upload_document))
        .route("/syllabi", post(upload_syllabus))
        .route("/{kind}/{id}", delete(delete_item))
        .route("/{kind}/{id}/download", get(download_item))
}
