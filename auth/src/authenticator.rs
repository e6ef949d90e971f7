use chrono::Duration;

use crate::gate::AccessPolicy;
use crate::gate::AuthGate;
use crate::gate::GateError;
use crate::identity::Identity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::secret::Secret;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Argon2id hash with default cost parameters that matches no password.
const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AUXbqY+gPCUK3qdddf/ioA$O8jt2yuSCKejL5xVMJV02to+LkDxdhYjf9UNj8sUAms";

/// Authentication coordinator combining password verification and token issuing.
///
/// Built once at startup and shared behind an `Arc`; holds no mutable state.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Bearer access token
    pub access_token: String,
    /// Identity encoded in the token
    pub identity: Identity,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Token signing secret
    /// * `token_ttl` - Lifetime of tokens issued at login
    pub fn new(secret: Secret, token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(secret, token_ttl),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a user's credentials and issue a token for them.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject_id` - Identifier of the user the hash belongs to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenError` - Subject is reserved or the token could not be built
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: i64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.check_password(password, stored_hash)?;

        let identity = Identity::user(subject_id, self.token_codec.ttl())?;
        self.issue(identity)
    }

    /// Verify the administrator's credentials and issue the admin token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenError` - Token could not be built
    pub fn authenticate_admin(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.check_password(password, stored_hash)?;

        self.issue(Identity::admin(self.token_codec.ttl())?)
    }

    /// Reject a login whose identifier has no stored hash.
    ///
    /// Runs a full verification against a fixed hash so the answer takes as
    /// long as a wrong password for an existing account.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, UNKNOWN_ACCOUNT_HASH);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token for an identity without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token encoding failed
    pub fn issue_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.token_codec.issue(identity)
    }

    /// Validate a bearer token and return its identity.
    ///
    /// # Errors
    /// * `TokenError` - Token validation failed
    pub fn validate_token(&self, token: &str) -> Result<Identity, TokenError> {
        self.token_codec.parse(token)
    }

    /// Authorize a request from its raw `Authorization` header.
    ///
    /// # Errors
    /// * `GateError` - Request must be rejected
    pub fn authorize(
        &self,
        header: Option<&str>,
        policy: AccessPolicy,
    ) -> Result<Identity, GateError> {
        AuthGate::new(&self.token_codec).authorize(header, policy)
    }

    fn check_password(&self, password: &str, stored_hash: &str) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash) {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    fn issue(&self, identity: Identity) -> Result<AuthenticationResult, AuthenticationError> {
        let access_token = self.token_codec.issue(&identity)?;

        Ok(AuthenticationResult {
            access_token,
            identity,
        })
    }
}
