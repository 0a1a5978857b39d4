use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct RegistrationConfig {
    /// Code an applicant must supply to register with the admin role.
    pub admin_code: String,
    /// Total fee assigned to students created without one.
    pub default_student_fee: f64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            admin_code: "SC2026ADMIN".to_string(),
            default_student_fee: 5000.0,
        }
    }
}

impl RegistrationConfig {
    pub fn from_env() -> Self {
        Self {
            admin_code: env::var("ADMIN_REGISTRATION_CODE")
                .unwrap_or_else(|_| "SC2026ADMIN".to_string()),
            default_student_fee: env_or("DEFAULT_STUDENT_FEE", 5000.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistrationConfig::default();
        assert_eq!(config.admin_code, "SC2026ADMIN");
        assert_eq!(config.default_student_fee, 5000.0);
    }
}
