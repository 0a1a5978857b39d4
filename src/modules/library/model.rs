use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LibrarySearchParams {
    /// Case-insensitive match on titles, authors and subjects.
    pub q: Option<String>,
}

/// A simulated download: attachment name plus text body.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedFile {
    pub file_name: String,
    pub content: String,
}
