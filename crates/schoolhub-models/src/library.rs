//! Library books and uploaded learning resources.
//!
//! Uploads only record metadata; no file content is stored.

use std::fmt;
use std::str::FromStr;

use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default = "one")]
    pub copies: u32,
    pub available: bool,
    #[serde(default)]
    pub borrowed_by: Option<String>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    pub id: RecordId,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "class", default)]
    pub class_name: String,
    pub title: String,
    pub description: String,
    pub upload_date: String,
    pub uploaded_by: String,
    #[serde(default)]
    pub file_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    /// Audience, e.g. "all", "teachers", "parents".
    #[serde(default)]
    pub access: String,
    pub title: String,
    pub description: String,
    pub upload_date: String,
    pub uploaded_by: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Syllabus {
    pub id: RecordId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default)]
    pub term: String,
    pub title: String,
    pub upload_date: String,
    pub uploaded_by: String,
    pub file_name: String,
}

/// Kind of library item addressed by delete and download routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LibraryItemKind {
    Books,
    Materials,
    Documents,
    Syllabi,
}

impl LibraryItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryItemKind::Books => "books",
            LibraryItemKind::Materials => "materials",
            LibraryItemKind::Documents => "documents",
            LibraryItemKind::Syllabi => "syllabi",
        }
    }

    /// Label used in simulated download text.
    pub fn noun(&self) -> &'static str {
        match self {
            LibraryItemKind::Books => "book",
            LibraryItemKind::Materials => "study-material",
            LibraryItemKind::Documents => "document",
            LibraryItemKind::Syllabi => "syllabus",
        }
    }
}

impl fmt::Display for LibraryItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "books" => Ok(LibraryItemKind::Books),
            "materials" => Ok(LibraryItemKind::Materials),
            "documents" => Ok(LibraryItemKind::Documents),
            "syllabi" => Ok(LibraryItemKind::Syllabi),
            other => Err(format!("Unknown library item type: {}", other)),
        }
    }
}

/// File name for a simulated download: non-alphanumerics become `_`.
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.txt", stem)
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateBookDto {
    #[validate(length(min = 1, max = 200, message = "Book title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Author is required"))]
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1000, max = 9999, message = "Year must have four digits"))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 1000, message = "Copies must be between 1 and 1000"))]
    pub copies: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateBookDto {
    #[validate(length(min = 1, max = 200, message = "Book title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Author is required"))]
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1000, max = 9999, message = "Year must have four digits"))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 1000, message = "Copies must be between 1 and 1000"))]
    pub copies: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UploadMaterialDto {
    pub subject: Option<String>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub file_count: u32,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UploadDocumentDto {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub access: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "Select a file"))]
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UploadSyllabusDto {
    pub subject: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub term: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Select a file"))]
    pub file_name: String,
}

/// Everything shown on the library page.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct LibraryCatalog {
    pub books: Vec<Book>,
    pub materials: Vec<StudyMaterial>,
    pub documents: Vec<DocumentRecord>,
    pub syllabi: Vec<Syllabus>,
}

impl LibraryCatalog {
    /// Keep only items whose title (or author, for books) contains `query`.
    pub fn filtered(mut self, query: &str) -> Self {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self;
        }
        let hit = |text: &str| text.to_lowercase().contains(&query);
        self.books.retain(|b| hit(&b.title) || hit(&b.author));
        self.materials.retain(|m| hit(&m.title) || hit(&m.subject));
        self.documents.retain(|d| hit(&d.title));
        self.syllabi.retain(|s| hit(&s.title) || hit(&s.subject));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Algebra: Part 1"), "Algebra__Part_1.txt");
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!("syllabi".parse::<LibraryItemKind>().unwrap(), LibraryItemKind::Syllabi);
        assert!("magazines".parse::<LibraryItemKind>().is_err());
    }

    #[test]
    fn test_catalog_filter() {
        let catalog = LibraryCatalog {
            books: vec![Book {
                id: 1,
                title: "Mathematics Grade 10".to_string(),
                author: "John Smith".to_string(),
                isbn: String::new(),
                category: String::new(),
                year: None,
                copies: 1,
                available: true,
                borrowed_by: None,
            }],
            ..Default::default()
        };
        assert_eq!(catalog.clone().filtered("smith").books.len(), 1);
        assert_eq!(catalog.filtered("physics").books.len(), 0);
    }
}
