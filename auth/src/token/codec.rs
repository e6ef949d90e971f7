use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::TokenError;
use crate::identity::Identity;
use crate::secret::Secret;

/// Byte placed between the payload and the integrity tag.
pub const SEPARATOR: u8 = b'^';

/// SHA-256 output size.
const TAG_LEN: usize = 32;

/// Issues and parses self-contained bearer tokens.
///
/// Wire format: `base64url(payload || '^' || sha256(payload || secret))`
/// where `payload` is the JSON encoded [`Identity`]. The tag has a fixed
/// width, so the separator is always the byte right before the final 32 bytes.
/// Both the payload and the tag are free to contain `^` themselves.
pub struct TokenCodec {
    secret: Secret,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec signing with `secret`.
    ///
    /// # Arguments
    /// * `secret` - Process signing secret
    /// * `ttl` - Lifetime given to identities issued at login
    pub fn new(secret: Secret, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode an identity into a bearer token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Identity could not be serialized
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let payload =
            serde_json::to_vec(identity).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(self.seal(&payload))
    }

    /// Validate a bearer token against the current time.
    ///
    /// # Errors
    /// * `MalformedToken` - Not base64url or no separator in place
    /// * `SignatureMismatch` - Tag does not match the payload and secret
    /// * `MalformedPayload` - Payload is not a well formed identity
    /// * `Expired` - Expiry is not strictly in the future
    pub fn parse(&self, token: &str) -> Result<Identity, TokenError> {
        self.parse_at(token, Utc::now())
    }

    /// Validate a bearer token against an explicit clock reading.
    pub fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let payload = self.open(token)?;

        let identity: Identity = serde_json::from_slice(&payload)
            .map_err(|e| TokenError::MalformedPayload(e.to_string()))?;

        if !identity.is_consistent() {
            return Err(TokenError::MalformedPayload(
                "role does not match subject".to_string(),
            ));
        }

        if identity.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(identity)
    }

    fn seal(&self, payload: &[u8]) -> String {
        let tag = self.tag(payload);

        let mut data = Vec::with_capacity(payload.len() + 1 + TAG_LEN);
        data.extend_from_slice(payload);
        data.push(SEPARATOR);
        data.extend_from_slice(&tag);

        URL_SAFE.encode(data)
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let mut data = URL_SAFE
            .decode(token)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))?;

        let separator_at = data
            .len()
            .checked_sub(TAG_LEN + 1)
            .filter(|&idx| data[idx] == SEPARATOR)
            .ok_or_else(|| TokenError::MalformedToken("separator not found".to_string()))?;

        let tag = data.split_off(separator_at + 1);
        data.truncate(separator_at);

        let expected = self.tag(&data);
        if !bool::from(expected.as_slice().ct_eq(tag.as_slice())) {
            return Err(TokenError::SignatureMismatch);
        }

        Ok(data)
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hasher.update(self.secret.expose());
        hasher.finalize().to_vec()
    }
}
