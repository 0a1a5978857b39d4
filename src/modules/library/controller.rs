use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::library::{
    Book, CreateBookDto, DocumentRecord, LibraryCatalog, LibraryItemKind, StudyMaterial, Syllabus,
    UpdateBookDto, UploadDocumentDto, UploadMaterialDto, UploadSyllabusDto,
};
use tracing::instrument;

use super::model::LibrarySearchParams;
use super::service::LibraryService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::utils::attachment::attachment;
use crate::validator::ValidatedJson;

fn parse_kind(kind: &str) -> Result<LibraryItemKind, AppError> {
    kind.parse::<LibraryItemKind>()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))
}

#[utoipa::path(
    get,
    path = "/api/library",
    params(LibrarySearchParams),
    responses((status = 200, description = "Books and uploaded resources", body = LibraryCatalog)),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
pub async fn get_catalog(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<LibrarySearchParams>,
) -> Json<LibraryCatalog> {
    let query = params.q.unwrap_or_default();
    Json(LibraryService::catalog(&state.store, &user, &query).await)
}

#[utoipa::path(
    post,
    path = "/api/library/books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book added", body = Book),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, admin, dto))]
pub async fn add_book(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = LibraryService::add_book(&state.store, admin.username(), dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/api/library/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    request_body = UpdateBookDto,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, admin, dto))]
pub async fn edit_book(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<UpdateBookDto>,
) -> Result<Json<Book>, AppError> {
    let book = LibraryService::edit_book(&state.store, admin.username(), id, dto).await?;
    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/api/library/books/{id}/borrow",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book borrowed", body = Book),
        (status = 409, description = "Already borrowed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, user))]
pub async fn borrow_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(LibraryService::borrow_book(&state.store, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/library/books/{id}/return",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book returned", body = Book),
        (status = 400, description = "Book is not on loan", body = ErrorResponse),
        (status = 403, description = "Not the borrower", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, user))]
pub async fn return_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(LibraryService::return_book(&state.store, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/library/materials",
    request_body = UploadMaterialDto,
    responses((status = 201, description = "Material uploaded", body = StudyMaterial)),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, staff, dto))]
pub async fn upload_material(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<UploadMaterialDto>,
) -> Result<(StatusCode, Json<StudyMaterial>), AppError> {
    let material = LibraryService::upload_material(&state.store, &staff, dto).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    post,
    path = "/api/library/documents",
    request_body = UploadDocumentDto,
    responses(
        (status = 201, description = "Document uploaded", body = DocumentRecord),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, admin, dto))]
pub async fn upload_document(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<UploadDocumentDto>,
) -> Result<(StatusCode, Json<DocumentRecord>), AppError> {
    let document = LibraryService::upload_document(&state.store, &admin, dto).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    post,
    path = "/api/library/syllabi",
    request_body = UploadSyllabusDto,
    responses((status = 201, description = "Syllabus uploaded", body = Syllabus)),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, staff, dto))]
pub async fn upload_syllabus(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<UploadSyllabusDto>,
) -> Result<(StatusCode, Json<Syllabus>), AppError> {
    let syllabus = LibraryService::upload_syllabus(&state.store, &staff, dto).await?;
    Ok((StatusCode::CREATED, Json(syllabus)))
}

#[utoipa::path(
    get,
    path = "/api/library/{kind}/{id}/download",
    params(
        ("kind" = String, Path, description = "materials, documents or syllabi"),
        ("id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Simulated file as a text attachment", content_type = "text/plain"),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, user))]
pub async fn download_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(String, RecordId)>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind)?;
    let file = LibraryService::download(&state.store, &user, kind, id).await?;
    Ok(attachment(&file.file_name, "text/plain; charset=utf-8", file.content))
}

#[utoipa::path(
    delete,
    path = "/api/library/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "books, materials, documents or syllabi"),
        ("id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Unknown item type", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
#[instrument(skip(state, admin))]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((kind, id)): Path<(String, RecordId)>,
) -> Result<StatusCode, AppError> {
    let kind = parse_kind(&kind)?;
    LibraryService::delete_item(&state.store, admin.username(), kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
