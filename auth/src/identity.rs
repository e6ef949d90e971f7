use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::token::TokenError;

/// Subject identifier reserved for the administrator identity.
pub const ADMIN_SUBJECT_ID: i64 = -1;

/// Role carried alongside the subject in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Authenticated principal decoded from a valid token.
///
/// Immutable once built. Only [`Identity::admin`] produces the reserved
/// [`ADMIN_SUBJECT_ID`]; the codec rejects payloads where role and subject
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "sub")]
    subject_id: i64,
    role: Role,
    #[serde(rename = "exp")]
    expires_at: DateTime<Utc>,
}

impl Identity {
    /// Identity for an ordinary user, expiring `ttl` from now.
    ///
    /// # Errors
    /// * `ReservedSubject` - `subject_id` is the admin sentinel
    /// * `ExpiryOutOfRange` - `now + ttl` is not a representable instant
    pub fn user(subject_id: i64, ttl: Duration) -> Result<Self, TokenError> {
        Self::user_until(subject_id, expiry_after(ttl)?)
    }

    /// Identity for an ordinary user with an absolute expiry.
    ///
    /// # Errors
    /// * `ReservedSubject` - `subject_id` is the admin sentinel
    pub fn user_until(subject_id: i64, expires_at: DateTime<Utc>) -> Result<Self, TokenError> {
        if subject_id == ADMIN_SUBJECT_ID {
            return Err(TokenError::ReservedSubject(subject_id));
        }
        Ok(Self {
            subject_id,
            role: Role::User,
            expires_at,
        })
    }

    /// Administrator identity, expiring `ttl` from now.
    ///
    /// # Errors
    /// * `ExpiryOutOfRange` - `now + ttl` is not a representable instant
    pub fn admin(ttl: Duration) -> Result<Self, TokenError> {
        Ok(Self::admin_until(expiry_after(ttl)?))
    }

    /// Administrator identity with an absolute expiry.
    pub fn admin_until(expires_at: DateTime<Utc>) -> Self {
        Self {
            subject_id: ADMIN_SUBJECT_ID,
            role: Role::Admin,
            expires_at,
        }
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Expired unless the expiry lies strictly after `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check that the role tag and the subject agree.
    pub(crate) fn is_consistent(&self) -> bool {
        match self.role {
            Role::Admin => self.subject_id == ADMIN_SUBJECT_ID,
            Role::User => self.subject_id != ADMIN_SUBJECT_ID,
        }
    }
}

fn expiry_after(ttl: Duration) -> Result<DateTime<Utc>, TokenError> {
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or(TokenError::ExpiryOutOfRange)
}
