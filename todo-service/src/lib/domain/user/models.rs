use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;
use crate::user::errors::UserNameError;

/// User aggregate entity.
///
/// Represents a registered user. The password hash never leaves the domain
/// and inbound layers through a response body.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type, assigned by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(UserId(id)),
            Ok(id) => Err(UserIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(UserIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, non-empty, at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name longer than 64 characters
    pub fn new(name: String) -> Result<Self, UserNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(UserNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User awaiting insertion; the database assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `name` - Validated name
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    pub fn new(
        name: UserName,
        email: EmailAddress,
        password: String,
    ) -> Result<Self, PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self {
            name,
            email,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert!(UserId::from_string("0").is_err());
        assert!(UserId::from_string("-1").is_err());
        assert!(UserId::from_string("abc").is_err());
    }

    #[test]
    fn test_user_name_is_trimmed() {
        let name = UserName::new("  Alice ".to_string()).expect("Valid name rejected");
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_user_name_validation() {
        assert_eq!(UserName::new("   ".to_string()), Err(UserNameError::Empty));
        assert_eq!(
            UserName::new("a".repeat(65)),
            Err(UserNameError::TooLong { max: 64, actual: 65 })
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_create_user_command_requires_password() {
        let name = UserName::new("Alice".to_string()).expect("Valid name rejected");
        let email = EmailAddress::new("alice@example.com".to_string()).expect("Valid email rejected");

        let result = CreateUserCommand::new(name, email, String::new());
        assert!(matches!(result, Err(PasswordPolicyError::Empty)));
    }
}
