/// Credential Verifier
///
/// Password hashing with bcrypt. The bcrypt output encodes the salt
/// and the cost factor, so verification needs nothing besides the
/// stored hash.
use bcrypt::{hash, verify};

use crate::error::{AppError, ValidationError};

const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash a password using bcrypt
///
/// Callers reject empty/missing passwords before this layer; no other
/// password policy applies here. The only guard is a length cap
/// (bcrypt truncates at 72 bytes, and unbounded input is a DoS
/// vector against a deliberately slow hash).
///
/// # Arguments
/// * `password` - Plain text password to hash
/// * `cost` - bcrypt cost factor (from configuration, default 10)
///
/// # Errors
/// Returns error if the password exceeds the length cap or bcrypt
/// hashing fails
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash.
///
/// A malformed stored hash counts as a non-match, never an error: the
/// caller treats the outcome exactly like a wrong password. bcrypt's
/// digest comparison does not early-exit on the first differing byte.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the test suite fast; the hash format is the same.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_is_not_plaintext() {
        let password = "pw123";
        let hash = hash_password(password, TEST_COST).expect("Failed to hash password");

        assert_ne!(password, hash);
        // Hash should start with bcrypt identifier
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let password = "pw123";
        let hash = hash_password(password, TEST_COST).expect("Failed to hash password");

        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "pw123";
        let hash = hash_password(password, TEST_COST).expect("Failed to hash password");

        assert!(!verify_password("pw124", &hash));
    }

    #[test]
    fn verify_treats_malformed_hash_as_non_match() {
        assert!(!verify_password("pw123", "not-a-bcrypt-hash"));
        assert!(!verify_password("pw123", ""));
    }

    #[test]
    fn short_passwords_are_accepted() {
        // No strength policy: length and composition are the caller's
        // business, only emptiness is rejected (at the routes).
        assert!(hash_password("pw123", TEST_COST).is_ok());
        assert!(hash_password("a", TEST_COST).is_ok());
    }

    #[test]
    fn too_long_password_rejected() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = hash_password(&long_password, TEST_COST);
        assert!(result.is_err());
    }
}
