//! Student records and DTOs.
//!
//! Each student carries a subject -> mark map and a derived 4.0-scale GPA
//! that is recomputed whenever marks change.

use std::collections::BTreeMap;

use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_SUBJECTS: [&str; 3] = ["math", "english", "science"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Fees {
    pub total: f64,
    pub paid: f64,
}

impl Fees {
    pub fn new(total: f64) -> Self {
        Self { total, paid: 0.0 }
    }

    pub fn pending(&self) -> f64 {
        (self.total - self.paid).max(0.0)
    }

    pub fn is_settled(&self) -> bool {
        self.paid >= self.total
    }

    /// Add a payment, capping `paid` at `total`. Returns the amount applied.
    pub fn apply_payment(&mut self, amount: f64) -> f64 {
        let before = self.paid;
        self.paid = (self.paid + amount).min(self.total);
        self.paid - before
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Attendance percentage, 0-100.
    pub attendance: u32,
    #[serde(default)]
    pub marks: BTreeMap<String, u32>,
    pub fees: Fees,
    #[serde(default, deserialize_with = "crate::compat::lenient_f64")]
    pub gpa: f64,
    /// Name of the linked parent account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// GPA on a 4.0 scale from the average mark, rounded to two decimals.
///
/// Marks {80, 90, 70} average 80, giving 3.20. No marks gives 0.
pub fn calculate_gpa(marks: &BTreeMap<String, u32>) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let sum: u32 = marks.values().sum();
    let average = f64::from(sum) / marks.len() as f64;
    (average / 100.0 * 4.0 * 100.0).round() / 100.0
}

pub fn default_marks() -> BTreeMap<String, u32> {
    DEFAULT_SUBJECTS
        .iter()
        .map(|subject| (subject.to_string(), 0))
        .collect()
}

impl Student {
    pub fn recompute_gpa(&mut self) {
        self.gpa = calculate_gpa(&self.marks);
    }

    pub fn average_mark(&self) -> Option<f64> {
        if self.marks.is_empty() {
            return None;
        }
        let sum: u32 = self.marks.values().sum();
        Some(f64::from(sum) / self.marks.len() as f64)
    }

    /// Case-insensitive match on name or class.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.class_name.to_lowercase().contains(&query)
    }
}

fn validate_marks(marks: &BTreeMap<String, u32>) -> Result<(), ValidationError> {
    if marks.keys().any(|subject| subject.trim().is_empty()) {
        let mut error = ValidationError::new("subject");
        error.message = Some("Subject names must not be empty".into());
        return Err(error);
    }
    if marks.values().any(|mark| *mark > 100) {
        let mut error = ValidationError::new("mark_range");
        error.message = Some("Marks must be between 0 and 100".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "Student name is required"))]
    pub name: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub parent: Option<String>,
    #[validate(range(min = 0.0, message = "Fees must not be negative"))]
    pub fees_total: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100, message = "Student name is required"))]
    pub name: Option<String>,
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 20, message = "Class is required"))]
    pub class_name: Option<String>,
    #[validate(range(max = 100, message = "Attendance must be between 0 and 100"))]
    pub attendance: Option<u32>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub parent: Option<String>,
    #[validate(range(min = 0.0, message = "Fees must not be negative"))]
    pub fees_total: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UpdateMarksDto {
    #[validate(custom(function = "validate_marks"))]
    pub marks: BTreeMap<String, u32>,
}

/// One row of a teacher's bulk class edit.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ClassStudentEdit {
    pub id: RecordId,
    #[validate(length(min = 1, max = 100, message = "Student name is required"))]
    pub name: Option<String>,
    #[validate(range(max = 100, message = "Attendance must be between 0 and 100"))]
    pub attendance: Option<u32>,
    #[validate(custom(function = "validate_marks"))]
    pub marks: Option<BTreeMap<String, u32>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct BulkStudentEditDto {
    #[validate(nested)]
    pub students: Vec<ClassStudentEdit>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct RecordPaymentDto {
    #[validate(range(exclusive_min = 0.0, message = "Payment amount must be greater than zero"))]
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct BulkDeleteDto {
    #[validate(length(min = 1, message = "Select at least one record"))]
    pub ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct StudentSearchParams {
    /// Case-insensitive match on name or class.
    pub q: Option<String>,
    /// Exact class filter.
    pub class: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(values: &[(&str, u32)]) -> BTreeMap<String, u32> {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_gpa_from_marks() {
        let m = marks(&[("math", 80), ("english", 90), ("science", 70)]);
        assert_eq!(calculate_gpa(&m), 3.2);
    }

    #[test]
    fn test_gpa_rounds_to_two_decimals() {
        let m = marks(&[("math", 78), ("english", 82), ("science", 80)]);
        assert_eq!(calculate_gpa(&m), 3.2);
        let m = marks(&[("math", 88), ("english", 90), ("science", 85)]);
        assert_eq!(calculate_gpa(&m), 3.51);
    }

    #[test]
    fn test_gpa_without_marks_is_zero() {
        assert_eq!(calculate_gpa(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_payment_is_clamped_to_total() {
        let mut fees = Fees {
            total: 5000.0,
            paid: 4500.0,
        };
        assert_eq!(fees.apply_payment(1000.0), 500.0);
        assert_eq!(fees.paid, 5000.0);
        assert!(fees.is_settled());
        assert_eq!(fees.apply_payment(10.0), 0.0);
        assert_eq!(fees.pending(), 0.0);
    }

    #[test]
    fn test_default_marks() {
        let m = default_marks();
        assert_eq!(m.len(), 3);
        assert!(m.values().all(|v| *v == 0));
    }

    #[test]
    fn test_student_json_uses_class_key() {
        let student = Student {
            id: 7,
            name: "Ada".to_string(),
            class_name: "10A".to_string(),
            attendance: 100,
            marks: default_marks(),
            fees: Fees::new(5000.0),
            gpa: 0.0,
            parent: None,
            email: None,
            phone: None,
            dob: None,
            address: None,
        };
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["class"], "10A");
        assert!(value.get("parent").is_none());
        assert!(student.matches("10a"));
        assert!(student.matches("ad"));
        assert!(!student.matches("11B"));
    }

    #[test]
    fn test_marks_validation() {
        let ok = UpdateMarksDto {
            marks: marks(&[("math", 100)]),
        };
        assert!(ok.validate().is_ok());
        let too_high = UpdateMarksDto {
            marks: marks(&[("math", 101)]),
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_payment_must_be_positive() {
        assert!(RecordPaymentDto { amount: 0.0 }.validate().is_err());
        assert!(RecordPaymentDto { amount: -5.0 }.validate().is_err());
        assert!(RecordPaymentDto { amount: 0.5 }.validate().is_ok());
    }

    #[test]
    fn test_student_reads_gpa_stored_as_text() {
        let json = r#"{
            "id": 1,
            "name": "John Doe",
            "class": "10A",
            "attendance": 85,
            "marks": {"math": 78, "english": 82, "science": 80},
            "fees": {"total": 5000, "paid": 3000},
            "avatar": null,
            "gpa": "3.20"
        }"#;
        let mut student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.gpa, 3.2);
        assert_eq!(student.fees.pending(), 2000.0);

        student.recompute_gpa();
        assert_eq!(student.gpa, 3.2);
        assert_eq!(serde_json::to_value(&student).unwrap()["gpa"], 3.2);
    }
}
