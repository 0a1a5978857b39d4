//! Password digests and strength rules.
//!
//! Passwords are stored as the lowercase hex SHA-256 digest of the password
//! followed by a fixed salt. Accounts registered by the browser-only app
//! still hold the plain password; those match verbatim and are re-hashed by
//! the caller once the login succeeds.

use sha2::{Digest, Sha256};
use validator::ValidationError;

const PASSWORD_SALT: &str = "schoolhub_salt";

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(PASSWORD_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

const DIGEST_HEX_LEN: usize = 64;

/// Whether a stored value has the shape of a digest from [`hash_password`].
pub fn is_password_digest(stored: &str) -> bool {
    stored.len() == DIGEST_HEX_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Check a password against a stored digest, or against a plain password
/// left by older data. A digest-shaped value is never compared verbatim.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_password_digest(stored) {
        hash_password(password).eq_ignore_ascii_case(stored)
    } else {
        !stored.is_empty() && password == stored
    }
}

/// Returns the list of unmet strength requirements, empty when the password
/// is acceptable.
pub fn check_password_strength(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("a number");
    }

    problems
}

/// `validator` hook for DTO password fields.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let problems = check_password_strength(password);
    if problems.is_empty() {
        return Ok(());
    }

    let mut error = ValidationError::new("password_strength");
    error.message = Some(format!("Password must contain {}", problems.join(", ")).into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_salted_sha256() {
        assert_eq!(
            hash_password("Secret123"),
            "82459e42f1c26247047c6763e5013fe218148f2ba409f385f65ee5737253cf86"
        );
    }

    #[test]
    fn test_verify_password() {
        let digest = hash_password("Secret123");
        assert!(verify_password("Secret123", &digest));
        assert!(verify_password("Secret123", &digest.to_uppercase()));
        assert!(!verify_password("secret123", &digest));
        assert!(!verify_password(&digest, &digest));
    }

    #[test]
    fn test_verify_plain_stored_password() {
        assert!(!is_password_digest("Teacher2024"));
        assert!(is_password_digest(&hash_password("Teacher2024")));
        assert!(verify_password("Teacher2024", "Teacher2024"));
        assert!(!verify_password("teacher2024", "Teacher2024"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_strength_accepts_complex_password() {
        assert!(check_password_strength("Teacher2024").is_empty());
        assert!(validate_password_strength("Teacher2024").is_ok());
    }

    #[test]
    fn test_strength_lists_every_problem() {
        let problems = check_password_strength("abc");
        assert_eq!(
            problems,
            vec!["at least 8 characters", "an uppercase letter", "a number"]
        );
    }

    #[test]
    fn test_strength_error_message() {
        let err = validate_password_strength("password").unwrap_err();
        let message = err.message.unwrap().to_string();
        assert!(message.contains("an uppercase letter"));
        assert!(message.contains("a number"));
    }
}
