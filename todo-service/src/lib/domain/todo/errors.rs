use thiserror::Error;

/// Error for TodoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoIdError {
    #[error("Invalid todo id: {0}")]
    InvalidFormat(String),
}

/// Error for TodoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTitleError {
    #[error("Title is required")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for TodoStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoStatusError {
    #[error("Unknown status '{0}' (expected 'pending' or 'completed')")]
    Unknown(String),
}

/// Top-level error for all todo-related operations
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid todo ID: {0}")]
    InvalidTodoId(#[from] TodoIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TodoTitleError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] TodoStatusError),

    /// Todo does not exist or belongs to another user
    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
