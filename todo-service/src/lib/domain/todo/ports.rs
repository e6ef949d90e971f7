use async_trait::async_trait;

use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::NewTodo;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::todo::errors::TodoError;
use crate::user::models::UserId;

/// Port for todo domain service operations.
///
/// Every operation is scoped to the owning user; a todo owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    /// Create a pending todo for `user_id`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_todo(
        &self,
        user_id: &UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Retrieve one of the user's todos.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist for this user
    /// * `DatabaseError` - Database operation failed
    async fn get_todo(&self, user_id: &UserId, id: &TodoId) -> Result<Todo, TodoError>;

    /// Retrieve all of the user's todos, oldest first.
    async fn list_todos(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Replace title, content, and status of one of the user's todos.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist for this user
    /// * `DatabaseError` - Database operation failed
    async fn update_todo(
        &self,
        user_id: &UserId,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Delete one of the user's todos.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist for this user
    /// * `DatabaseError` - Database operation failed
    async fn delete_todo(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError>;
}

/// Persistence operations for todos.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError>;

    async fn find_by_id(&self, user_id: &UserId, id: &TodoId) -> Result<Option<Todo>, TodoError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Persist the editable fields and `updated_at` of an existing todo.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist for its user
    async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// # Errors
    /// * `NotFound` - Todo does not exist for this user
    async fn delete(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError>;
}
