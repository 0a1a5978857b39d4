use chrono::NaiveDate;
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    /// Left blank when the register was saved.
    NotMarked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub student_id: RecordId,
    pub student_name: String,
    pub status: AttendanceStatus,
}

/// One register taken for a class on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub records: Vec<AttendanceEntry>,
    pub taken_by: String,
}

impl AttendanceRecord {
    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceMark {
    pub student_id: RecordId,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct SaveAttendanceDto {
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Mark at least one student"))]
    pub records: Vec<AttendanceMark>,
}
