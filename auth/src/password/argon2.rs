use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id with
/// the crate's default cost parameters).
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is drawn on every call, so hashing the same
    /// password twice yields two different strings.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns false on mismatch, on an empty password or hash, and on a
    /// hash that is not a valid PHC string.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.is_empty() || hash.is_empty() {
            return false;
        }

        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::debug!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("password").expect("Failed to hash password");
        let second = hasher.hash("password").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("password", &first));
        assert!(hasher.verify("password", &second));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("password", "invalid_hash"));
    }

    #[test]
    fn test_verify_empty_inputs() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("password").expect("Failed to hash password");

        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_unicode_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("pässwörd-密码").expect("Failed to hash password");

        assert!(hasher.verify("pässwörd-密码", &hash));
        assert!(!hasher.verify("passwort-密码", &hash));
    }
}
