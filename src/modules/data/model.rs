use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of an undo or redo request.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// False when there was nothing to step over.
    pub changed: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeResponse {
    pub dark_mode: bool,
}
