use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::todo::errors::TodoIdError;
use crate::todo::errors::TodoStatusError;
use crate::todo::errors::TodoTitleError;
use crate::user::models::UserId;

/// Todo entity, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: TodoTitle,
    pub content: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Todo unique identifier type, assigned by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(pub i64);

impl TodoId {
    /// Parse a todo ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, TodoIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(TodoId(id)),
            Ok(id) => Err(TodoIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(TodoIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Todo title value type
///
/// Trimmed, non-empty, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    const MAX_LENGTH: usize = 200;

    /// Create a new valid title.
    ///
    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title longer than 200 characters
    pub fn new(title: String) -> Result<Self, TodoTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length == 0 {
            Err(TodoTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Progress state of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::Completed => "completed",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = TodoStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoStatus::Pending),
            "completed" => Ok(TodoStatus::Completed),
            other => Err(TodoStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Todo awaiting insertion; the database assigns the id.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: TodoTitle,
    pub content: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
}

/// Command to create a todo
#[derive(Debug)]
pub struct CreateTodoCommand {
    pub title: TodoTitle,
    pub content: String,
}

/// Command replacing the editable fields of a todo
#[derive(Debug)]
pub struct UpdateTodoCommand {
    pub title: TodoTitle,
    pub content: String,
    pub status: TodoStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_validation() {
        assert_eq!(
            TodoTitle::new("  buy milk ".to_string()).map(|t| t.as_str().to_string()),
            Ok("buy milk".to_string())
        );
        assert_eq!(TodoTitle::new(" ".to_string()), Err(TodoTitleError::Empty));
        assert!(matches!(
            TodoTitle::new("x".repeat(201)),
            Err(TodoTitleError::TooLong { .. })
        ));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<TodoStatus>(), Ok(TodoStatus::Pending));
        assert_eq!("completed".parse::<TodoStatus>(), Ok(TodoStatus::Completed));
        assert!("done".parse::<TodoStatus>().is_err());
        assert_eq!(TodoStatus::default(), TodoStatus::Pending);
    }

    #[test]
    fn test_todo_id_from_string() {
        assert_eq!(TodoId::from_string("3"), Ok(TodoId(3)));
        assert!(TodoId::from_string("0").is_err());
        assert!(TodoId::from_string("three").is_err());
    }
}
