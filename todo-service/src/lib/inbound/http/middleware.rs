use auth::AccessPolicy;
use auth::GateError;
use auth::Identity;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::models::UserId;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
}

impl AuthenticatedUser {
    /// Id of the user owning the request.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is the administrator, who owns no data
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        if self.identity.is_admin() {
            return Err(ApiError::Forbidden(
                "Administrator has no user data".to_string(),
            ));
        }
        Ok(UserId(self.identity.subject_id()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(TOKEN_NOT_FOUND.to_string()))
    }
}

const TOKEN_NOT_FOUND: &str = "Unauthorized [token not found]";
const INVALID_TOKEN: &str = "Unauthorized [invalid token]";

/// Middleware accepting any valid bearer token
pub async fn require_user(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, AccessPolicy::UserOnly).await
}

/// Middleware accepting only the administrator's bearer token
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, AccessPolicy::AdminOnly).await
}

async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    policy: AccessPolicy,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = state
        .authenticator
        .authorize(header, policy)
        .map_err(|e| reject(e, policy))?;

    tracing::debug!(
        subject_id = identity.subject_id(),
        role = ?identity.role(),
        "Request authorized"
    );

    req.extensions_mut().insert(AuthenticatedUser { identity });

    Ok(next.run(req).await)
}

/// Log the precise reason, answer with a generic one.
fn reject(err: GateError, policy: AccessPolicy) -> ApiError {
    match err {
        GateError::MissingToken => {
            tracing::warn!(?policy, "Bearer token not found");
            ApiError::Unauthorized(TOKEN_NOT_FOUND.to_string())
        }
        GateError::Token(e) => {
            tracing::warn!(?policy, reason = %e, "Bearer token rejected");
            ApiError::Unauthorized(INVALID_TOKEN.to_string())
        }
        GateError::Forbidden => {
            tracing::warn!(?policy, "Bearer token lacks the required role");
            ApiError::Forbidden("Forbidden".to_string())
        }
    }
}
