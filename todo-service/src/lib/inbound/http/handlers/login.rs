use auth::AuthenticationError;
use auth::AuthenticationResult;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<LoginResponseData>), ApiError> {
    let email = EmailAddress::new(body.email).map_err(|_| ApiError::invalid_credentials())?;

    let (result, user) = match state.admin.as_deref() {
        Some(admin) if admin.email == email.as_str() => {
            let result = state
                .authenticator
                .authenticate_admin(&body.password, &admin.password_hash)
                .map_err(from_authentication_error)?;
            (result, None)
        }
        _ => {
            // Credential store lookup
            let user = state
                .user_service
                .get_user_by_email(&email)
                .await
                .map_err(|e| match e {
                    UserError::NotFoundByEmail(_) => {
                        from_authentication_error(state.authenticator.reject_unknown(&body.password))
                    }
                    _ => ApiError::from(e),
                })?;

            let result = state
                .authenticator
                .authenticate(&body.password, &user.password_hash, user.id.0)
                .map_err(from_authentication_error)?;
            (result, Some(UserData::from(&user)))
        }
    };

    let AuthenticationResult {
        access_token,
        identity,
    } = result;

    tracing::info!(
        subject_id = identity.subject_id(),
        role = ?identity.role(),
        expires_at = %identity.expires_at(),
        "Login succeeded"
    );

    Ok((
        [(header::AUTHORIZATION, format!("Bearer {}", access_token))],
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                token: access_token,
                expires_at: identity.expires_at(),
                user,
            },
        ),
    ))
}

fn from_authentication_error(err: AuthenticationError) -> ApiError {
    match err {
        AuthenticationError::InvalidCredentials => ApiError::invalid_credentials(),
        AuthenticationError::PasswordError(err) => {
            ApiError::InternalServerError(format!("Password verification failed: {}", err))
        }
        AuthenticationError::TokenError(err) => {
            ApiError::InternalServerError(format!("Token generation failed: {}", err))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Absent for the administrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserData>,
}
