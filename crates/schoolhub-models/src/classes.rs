use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Characters that would split or truncate `/api/classes/{name}`.
const RESERVED_PATH_CHARS: [char; 4] = ['/', '?', '#', '%'];

fn validate_class_name(name: &str) -> Result<(), ValidationError> {
    if name.contains(RESERVED_PATH_CHARS) {
        let mut error = ValidationError::new("class_name");
        error.message = Some("Class name must not contain / ? # or %".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateClassDto {
    #[validate(
        length(min = 1, max = 20, message = "Class name is required"),
        custom(function = "validate_class_name")
    )]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClassSummary {
    pub name: String,
    pub student_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str) -> CreateClassDto {
        CreateClassDto {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_class_name_accepted() {
        assert!(dto("12C").validate().is_ok());
        assert!(dto("Year 5 & 6").validate().is_ok());
    }

    #[test]
    fn test_class_name_rejects_path_characters() {
        for name in ["5/6", "10A?", "10#B", "50%"] {
            let errors = dto(name).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("name"), "{name}");
        }
    }
}
