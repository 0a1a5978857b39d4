use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: RecordId,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub classes: Vec<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::compat::lenient_text"
    )]
    pub experience: Option<String>,
}

/// School address derived from a name: "Mr. Wilson" -> "mr.wilson@school.com".
pub fn default_teacher_email(name: &str) -> String {
    let local: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect();
    format!("{}@school.com", local)
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100, message = "Teacher name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,
    /// Defaults to an address derived from the name.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_teacher_email() {
        assert_eq!(default_teacher_email("Ms. Ada Lovelace"), "ms.adalovelace@school.com");
    }

    #[test]
    fn test_create_teacher_dto_requires_subject() {
        let dto = CreateTeacherDto {
            name: "Mr. Brown".to_string(),
            subject: String::new(),
            email: None,
            phone: None,
            qualification: None,
            experience: None,
            classes: vec![],
        };
        assert!(dto.validate().is_err());
    }
    #[test]
    fn test_teacher_reads_numeric_experience() {
        let json = r#"{
            "id": 1704880000000,
            "name": "Mr. Brown",
            "subject": "Physics",
            "classes": ["11A"],
            "email": "brown@school.com",
            "experience": 7,
            "avatar": null
        }"#;
        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert_eq!(teacher.experience.as_deref(), Some("7"));
        assert_eq!(teacher.phone, None);
    }
}
