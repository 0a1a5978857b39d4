//! User accounts, roles and account DTOs.
//!
//! Accounts are unique by `(username, role)`: the same username may be
//! registered once as a teacher and once as a parent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schoolhub_core::RecordId;
use schoolhub_core::password::validate_password_strength;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Parent,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
        }
    }

    /// Capitalized name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Teacher => "Teacher",
            Role::Parent => "Parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "parent" => Ok(Role::Parent),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// A registered account as persisted under `registeredUsers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub username: String,
    /// Salted SHA-256 digest. Accounts written by the browser-only app hold
    /// the plain password until their next successful login.
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(deserialize_with = "crate::compat::timestamp")]
    pub registered_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_class: Option<String>,
}

impl User {
    pub fn is(&self, username: &str, role: Role) -> bool {
        self.username == username && self.role == role
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            role: self.role,
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            registered_date: self.registered_date,
        }
    }
}

/// Account data safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: RecordId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub registered_date: DateTime<Utc>,
}

/// Initials used for avatars, e.g. "Mr. Wilson" -> "MW".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct RegisterRequestDto {
    pub role: Role,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Required when registering an admin.
    #[serde(default)]
    pub admin_code: Option<String>,
    /// Parents may register their child in the same step.
    #[serde(default)]
    pub child_name: Option<String>,
    #[serde(default)]
    pub child_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    pub role: Role,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct UpdateAccountDto {
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "New passwords do not match"))]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            role: Role::Teacher,
            name: "Grace Hopper".to_string(),
            email: "grace@school.com".to_string(),
            username: "ghopper".to_string(),
            password: "Compiler1952".to_string(),
            confirm_password: "Compiler1952".to_string(),
            phone: None,
            address: None,
            admin_code: None,
            child_name: None,
            child_class: None,
        }
    }

    #[test]
    fn test_role_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Parent ".parse::<Role>().unwrap(), Role::Parent);
        assert!("student".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Mr. Wilson"), "MW");
        assert_eq!(initials("jane smith"), "JS");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_dto_rejects_mismatched_confirmation() {
        let mut dto = register_dto();
        dto.confirm_password = "Compiler1953".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_register_dto_rejects_weak_password() {
        let mut dto = register_dto();
        dto.password = "weakpass".to_string();
        dto.confirm_password = "weakpass".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_dto_rejects_bad_email() {
        let mut dto = register_dto();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_user_deserializes_legacy_record() {
        let json = r#"{
            "id": 1700000000000,
            "role": "parent",
            "name": "Mrs. Doe",
            "email": "doe@mail.com",
            "username": "mdoe",
            "password": "abc",
            "registeredDate": "2024-01-05T10:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is("mdoe", Role::Parent));
        assert!(!user.is("mdoe", Role::Teacher));
        assert_eq!(user.phone, "");
        assert_eq!(user.profile().username, "mdoe");
    }

    #[test]
    fn test_user_deserializes_browser_registration() {
        let json = r#"{
            "id": 1704880000000,
            "role": "teacher",
            "name": "Mr. Brown",
            "email": "brown@school.com",
            "username": "brown",
            "password": "Teacher2024",
            "phone": "",
            "address": "",
            "registeredDate": "2024-01-10",
            "lastLogin": null,
            "isActive": true
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.registered_date.format("%Y-%m-%d").to_string(), "2024-01-10");
        assert_eq!(user.password, "Teacher2024");

        let again: User = serde_json::from_value(serde_json::to_value(&user).unwrap()).unwrap();
        assert_eq!(again, user);
    }
}
