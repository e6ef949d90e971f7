use thiserror::Error;

/// Error type for token issuing and parsing.
///
/// Each parse gate fails with its own variant. Callers facing the network
/// should collapse these to a generic rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token payload: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("Token is expired")]
    Expired,

    #[error("Subject id {0} is reserved for the administrator")]
    ReservedSubject(i64),

    #[error("Token lifetime puts the expiry out of range")]
    ExpiryOutOfRange,
}
