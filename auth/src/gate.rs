use thiserror::Error;

use crate::identity::Identity;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Prefix expected on the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Acceptance rule applied to a successfully parsed identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any valid token is accepted.
    UserOnly,
    /// Only the administrator identity is accepted.
    AdminOnly,
}

impl AccessPolicy {
    fn admits(&self, identity: &Identity) -> bool {
        match self {
            AccessPolicy::UserOnly => true,
            AccessPolicy::AdminOnly => identity.is_admin(),
        }
    }
}

/// Reasons a request is turned away by the gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Bearer token not found")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Identity is not allowed by the access policy")]
    Forbidden,
}

/// Request authorization shared by every protected route.
///
/// Framework agnostic: takes the raw `Authorization` header value and yields
/// the identity to attach to the request.
pub struct AuthGate<'a> {
    codec: &'a TokenCodec,
}

impl<'a> AuthGate<'a> {
    pub fn new(codec: &'a TokenCodec) -> Self {
        Self { codec }
    }

    /// Extract, validate, and check a bearer token.
    ///
    /// # Arguments
    /// * `header` - Raw `Authorization` header value, if present
    /// * `policy` - Acceptance rule for the decoded identity
    ///
    /// # Errors
    /// * `MissingToken` - Header absent, not `Bearer `, or empty token
    /// * `Token` - Token parsing failed (kind preserved)
    /// * `Forbidden` - Token is valid but the policy rejects the identity
    pub fn authorize(
        &self,
        header: Option<&str>,
        policy: AccessPolicy,
    ) -> Result<Identity, GateError> {
        let token = extract_bearer(header).ok_or(GateError::MissingToken)?;

        let identity = self.codec.parse(token)?;

        if !policy.admits(&identity) {
            return Err(GateError::Forbidden);
        }

        Ok(identity)
    }
}

fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let header = header?;
    if header.len() <= BEARER_PREFIX.len() {
        return None;
    }
    header.strip_prefix(BEARER_PREFIX)
}
