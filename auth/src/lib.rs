//! Authentication utilities library
//!
//! Provides the authentication core of the todo service:
//! - Password hashing (Argon2id)
//! - Self-issued bearer tokens signed with a process secret
//! - Request authorization with user and admin policies
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Identity, Secret, TokenCodec};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(Secret::new("secret_key").unwrap(), Duration::minutes(15));
//! let identity = Identity::user(42, codec.ttl()).unwrap();
//! let token = codec.issue(&identity).unwrap();
//! assert_eq!(codec.parse(&token).unwrap(), identity);
//! ```
//!
//! ## Request Authorization
//! ```
//! use auth::{AccessPolicy, Authenticator, GateError, Secret};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(Secret::new("secret_key").unwrap(), Duration::minutes(15));
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let result = auth.authenticate("password123", &hash, 42).unwrap();
//! let header = format!("Bearer {}", result.access_token);
//!
//! assert!(auth.authorize(Some(&header), AccessPolicy::UserOnly).is_ok());
//! assert_eq!(
//!     auth.authorize(Some(&header), AccessPolicy::AdminOnly),
//!     Err(GateError::Forbidden)
//! );
//! ```

pub mod authenticator;
pub mod gate;
pub mod identity;
pub mod password;
pub mod secret;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use gate::AccessPolicy;
pub use gate::AuthGate;
pub use gate::GateError;
pub use identity::Identity;
pub use identity::Role;
pub use identity::ADMIN_SUBJECT_ID;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::Secret;
pub use secret::SecretError;
pub use token::TokenCodec;
pub use token::TokenError;
