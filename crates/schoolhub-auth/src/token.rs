//! Session token generation.

use rand::RngCore;

/// Bytes of randomness in a session token.
pub const TOKEN_BYTES: usize = 32;

/// Generates an opaque session token: 32 random bytes, hex encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_session_token(), generate_session_token());
    }
}
