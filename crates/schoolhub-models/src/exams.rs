use chrono::NaiveDate;
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_EXAM_DURATION: &str = "2 hours";
pub const DEFAULT_TOTAL_MARKS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: RecordId,
    pub subject: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub duration: String,
    pub total_marks: u32,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: String,
    pub date: NaiveDate,
    pub duration: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "Total marks must be between 1 and 1000"))]
    pub total_marks: Option<u32>,
}
