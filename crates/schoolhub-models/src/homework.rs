use chrono::NaiveDate;
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Days between assignment and the default due date.
pub const DEFAULT_DUE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Pending,
    Active,
    Completed,
}

/// Homework and graded assignments share one list; assignments carry a
/// title and total marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: RecordId,
    #[serde(rename = "class")]
    pub class_name: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub task: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub status: HomeworkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct AssignHomeworkDto {
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: String,
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Task description is required"))]
    pub task: String,
    /// Defaults to a week from today.
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateAssignmentDto {
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: String,
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub due_date: NaiveDate,
    #[validate(range(min = 1, max = 1000, message = "Total marks must be between 1 and 1000"))]
    pub total_marks: u32,
}
