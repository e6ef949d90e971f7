use secrecy::ExposeSecret;
use secrecy::SecretSlice;
use thiserror::Error;

/// Error type for signing secret construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Signing secret must not be empty")]
    Empty,
}

/// Process-wide token signing secret.
///
/// Built once at startup and moved into the [`TokenCodec`](crate::TokenCodec).
/// The bytes are zeroized on drop and `Debug` output is redacted.
pub struct Secret(SecretSlice<u8>);

impl Secret {
    /// Create a signing secret from raw bytes.
    ///
    /// # Errors
    /// * `Empty` - No bytes were supplied
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(SecretSlice::from(bytes)))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        assert_eq!(Secret::new(Vec::new()).unwrap_err(), SecretError::Empty);
        assert_eq!(Secret::new("").unwrap_err(), SecretError::Empty);
    }

    #[test]
    fn test_secret_exposes_bytes() {
        let secret = Secret::new("signing-key").expect("Failed to build secret");
        assert_eq!(secret.expose(), b"signing-key");
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = Secret::new("signing-key").expect("Failed to build secret");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("signing-key"));
        assert!(rendered.contains("REDACTED"));
    }
}
