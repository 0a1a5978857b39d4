use anyhow::anyhow;
use chrono::Local;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::Role;
use schoolhub_models::library::{
    Book, CreateBookDto, DocumentRecord, LibraryCatalog, LibraryItemKind, StudyMaterial, Syllabus,
    UpdateBookDto, UploadDocumentDto, UploadMaterialDto, UploadSyllabusDto, download_file_name,
};
use schoolhub_store::{SchoolState, SchoolStore};
use tracing::instrument;

use super::model::SimulatedFile;
use crate::middleware::auth::AuthUser;
use crate::utils::clock::today;

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Documents carry an audience; staff-only material stays hidden from parents.
pub fn document_visible(role: Role, document: &DocumentRecord) -> bool {
    match (role, document.access.as_str()) {
        (Role::Admin, _) => true,
        (_, "" | "all") => true,
        (Role::Teacher, "teachers") => true,
        (Role::Parent, "parents") => true,
        _ => false,
    }
}

fn book_not_found(id: RecordId) -> AppError {
    AppError::not_found(anyhow!("Book with id {} not found", id))
}

pub fn simulated_file(kind: LibraryItemKind, title: &str) -> SimulatedFile {
    SimulatedFile {
        file_name: download_file_name(title),
        content: format!(
            "This is a simulated {} file: {}\n\nGenerated by Southern Cross School Management System\nDate: {}",
            kind.noun(),
            title,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
    }
}

/// Catalog as seen by `role`, filtered by `query`.
pub fn catalog_for(state: &SchoolState, role: Role, query: &str) -> LibraryCatalog {
    LibraryCatalog {
        books: state.data.library.clone(),
        materials: state.study_materials.clone(),
        documents: state
            .documents
            .iter()
            .filter(|d| document_visible(role, d))
            .cloned()
            .collect(),
        syllabi: state.syllabi.clone(),
    }
    .filtered(query)
}

pub struct LibraryService;

impl LibraryService {
    pub async fn catalog(store: &SchoolStore, user: &AuthUser, query: &str) -> LibraryCatalog {
        store
            .read(|state| catalog_for(state, user.role(), query))
            .await
    }

    #[instrument(skip(store, dto), fields(title = %dto.title))]
    pub async fn add_book(store: &SchoolStore, actor: &str, dto: CreateBookDto) -> Result<Book, AppError> {
        store
            .mutate(|tx| {
                let book = Book {
                    id: tx.next_id(),
                    title: dto.title.trim().to_string(),
                    author: dto.author.trim().to_string(),
                    isbn: text(dto.isbn),
                    category: text(dto.category),
                    year: dto.year,
                    copies: dto.copies.unwrap_or(1),
                    available: true,
                    borrowed_by: None,
                };
                tx.data.library.push(book.clone());
                tx.audit(actor, "add_book", format!("Book \"{}\" added", book.title));
                Ok::<_, AppError>(book)
            })
            .await
    }

    #[instrument(skip(store, dto))]
    pub async fn edit_book(
        store: &SchoolStore,
        actor: &str,
        id: RecordId,
        dto: UpdateBookDto,
    ) -> Result<Book, AppError> {
        store
            .mutate(|tx| {
                let book = tx
                    .data
                    .library
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| book_not_found(id))?;
                if let Some(title) = dto.title {
                    book.title = title.trim().to_string();
                }
                if let Some(author) = dto.author {
                    book.author = author.trim().to_string();
                }
                if let Some(isbn) = dto.isbn {
                    book.isbn = isbn.trim().to_string();
                }
                if let Some(category) = dto.category {
                    book.category = category.trim().to_string();
                }
                if dto.year.is_some() {
                    book.year = dto.year;
                }
                if let Some(copies) = dto.copies {
                    book.copies = copies;
                }
                let book = book.clone();
                tx.audit(actor, "edit_book", format!("Book \"{}\" updated", book.title));
                Ok(book)
            })
            .await
    }

    #[instrument(skip(store, user))]
    pub async fn borrow_book(store: &SchoolStore, user: &AuthUser, id: RecordId) -> Result<Book, AppError> {
        store
            .mutate(|tx| {
                let book = tx
                    .data
                    .library
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| book_not_found(id))?;
                if !book.available {
                    return Err(AppError::conflict(anyhow!(
                        "{} is already borrowed",
                        book.title
                    )));
                }
                book.available = false;
                book.borrowed_by = Some(user.name().to_string());
                let book = book.clone();
                tx.audit(user.username(), "borrow_book", format!("Borrowed \"{}\"", book.title));
                Ok(book)
            })
            .await
    }

    /// Only the borrower or staff may return a book.
    #[instrument(skip(store, user))]
    pub async fn return_book(store: &SchoolStore, user: &AuthUser, id: RecordId) -> Result<Book, AppError> {
        store
            .mutate(|tx| {
                let book = tx
                    .data
                    .library
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or_else(|| book_not_found(id))?;
                if book.available {
                    return Err(AppError::bad_request(anyhow!("{} is not on loan", book.title)));
                }
                if user.role() == Role::Parent && book.borrowed_by.as_deref() != Some(user.name()) {
                    return Err(AppError::forbidden("Only the borrower can return this book"));
                }
                book.available = true;
                book.borrowed_by = None;
                let book = book.clone();
                tx.audit(user.username(), "return_book", format!("Returned \"{}\"", book.title));
                Ok(book)
            })
            .await
    }

    #[instrument(skip(store, user, dto), fields(title = %dto.title))]
    pub async fn upload_material(
        store: &SchoolStore,
        user: &AuthUser,
        dto: UploadMaterialDto,
    ) -> Result<StudyMaterial, AppError> {
        store
            .mutate(|tx| {
                let material = StudyMaterial {
                    id: tx.next_id(),
                    subject: text(dto.subject),
                    class_name: text(dto.class_name),
                    title: dto.title.trim().to_string(),
                    description: dto.description.trim().to_string(),
                    upload_date: today(),
                    uploaded_by: user.name().to_string(),
                    file_count: dto.file_count,
                };
                tx.study_materials.push(material.clone());
                tx.audit(
                    user.username(),
                    "upload_study_material",
                    format!("Study material \"{}\" uploaded", material.title),
                );
                Ok::<_, AppError>(material)
            })
            .await
    }

    #[instrument(skip(store, user, dto), fields(title = %dto.title))]
    pub async fn upload_document(
        store: &SchoolStore,
        user: &AuthUser,
        dto: UploadDocumentDto,
    ) -> Result<DocumentRecord, AppError> {
        store
            .mutate(|tx| {
                let access = text(dto.access);
                let document = DocumentRecord {
                    id: tx.next_id(),
                    doc_type: text(dto.doc_type),
                    access: if access.is_empty() { "all".to_string() } else { access },
                    title: dto.title.trim().to_string(),
                    description: dto.description.trim().to_string(),
                    upload_date: today(),
                    uploaded_by: user.name().to_string(),
                    file_name: dto.file_name.trim().to_string(),
                };
                tx.documents.push(document.clone());
                tx.audit(
                    user.username(),
                    "upload_document",
                    format!("Document \"{}\" uploaded", document.title),
                );
                Ok::<_, AppError>(document)
            })
            .await
    }

    #[instrument(skip(store, user, dto), fields(title = %dto.title))]
    pub async fn upload_syllabus(
        store: &SchoolStore,
        user: &AuthUser,
        dto: UploadSyllabusDto,
    ) -> Result<Syllabus, AppError> {
        store
            .mutate(|tx| {
                let syllabus = Syllabus {
                    id: tx.next_id(),
                    subject: text(dto.subject),
                    year: text(dto.year),
                    class_name: text(dto.class_name),
                    term: text(dto.term),
                    title: dto.title.trim().to_string(),
                    upload_date: today(),
                    uploaded_by: user.name().to_string(),
                    file_name: dto.file_name.trim().to_string(),
                };
                tx.syllabi.push(syllabus.clone());
                tx.audit(
                    user.username(),
                    "upload_syllabus",
                    format!("Syllabus \"{}\" uploaded", syllabus.title),
                );
                Ok::<_, AppError>(syllabus)
            })
            .await
    }

    /// Build the simulated file for an uploaded item and record the download.
    #[instrument(skip(store, user))]
    pub async fn download(
        store: &SchoolStore,
        user: &AuthUser,
        kind: LibraryItemKind,
        id: RecordId,
    ) -> Result<SimulatedFile, AppError> {
        let role = user.role();
        let (title, action) = store
            .read(|state| match kind {
                LibraryItemKind::Books => None,
                LibraryItemKind::Materials => state
                    .study_materials
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| (m.title.clone(), "download_material")),
                LibraryItemKind::Documents => state
                    .documents
                    .iter()
                    .find(|d| d.id == id && document_visible(role, d))
                    .map(|d| (d.title.clone(), "download_document")),
                LibraryItemKind::Syllabi => state
                    .syllabi
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| (s.title.clone(), "download_syllabus")),
            })
            .await
            .ok_or_else(|| {
                if kind == LibraryItemKind::Books {
                    AppError::bad_request(anyhow!("Books cannot be downloaded"))
                } else {
                    AppError::not_found(anyhow!("Item not found"))
                }
            })?;

        store
            .record_audit(
                user.username(),
                action,
                format!("Downloaded {}: {}", kind.noun().replace('-', " "), title),
            )
            .await?;
        Ok(simulated_file(kind, &title))
    }

    #[instrument(skip(store))]
    pub async fn delete_item(
        store: &SchoolStore,
        actor: &str,
        kind: LibraryItemKind,
        id: RecordId,
    ) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let removed = match kind {
                    LibraryItemKind::Books => {
                        let before = tx.data.library.len();
                        tx.data.library.retain(|b| b.id != id);
                        before - tx.data.library.len()
                    }
                    LibraryItemKind::Materials => {
                        let before = tx.study_materials.len();
                        tx.study_materials.retain(|m| m.id != id);
                        before - tx.study_materials.len()
                    }
                    LibraryItemKind::Documents => {
                        let before = tx.documents.len();
                        tx.documents.retain(|d| d.id != id);
                        before - tx.documents.len()
                    }
                    LibraryItemKind::Syllabi => {
                        let before = tx.syllabi.len();
                        tx.syllabi.retain(|s| s.id != id);
                        before - tx.syllabi.len()
                    }
                };
                if removed == 0 {
                    return Err(AppError::not_found(anyhow!("Item not found")));
                }
                tx.audit(
                    actor,
                    "delete_library_item",
                    format!("Deleted {} item with ID {}", kind, id),
                );
                Ok(())
            })
            .await
    }
}
