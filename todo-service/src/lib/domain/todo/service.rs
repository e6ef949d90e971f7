use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::NewTodo;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoStatus;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::todo::errors::TodoError;
use crate::todo::ports::TodoRepository;
use crate::todo::ports::TodoServicePort;
use crate::user::models::UserId;

/// Domain service implementation for todo operations.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn create_todo(
        &self,
        user_id: &UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let todo = NewTodo {
            user_id: *user_id,
            title: command.title,
            content: command.content,
            status: TodoStatus::Pending,
            created_at: Utc::now(),
        };

        let created = self.repository.create(todo).await?;
        tracing::debug!(user_id = %user_id, todo_id = %created.id, "Todo created");

        Ok(created)
    }

    async fn get_todo(&self, user_id: &UserId, id: &TodoId) -> Result<Todo, TodoError> {
        self.repository
            .find_by_id(user_id, id)
            .await?
            .ok_or(TodoError::NotFound(id.to_string()))
    }

    async fn list_todos(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        self.repository.list_by_user(user_id).await
    }

    async fn update_todo(
        &self,
        user_id: &UserId,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let mut todo = self.get_todo(user_id, id).await?;

        todo.title = command.title;
        todo.content = command.content;
        todo.status = command.status;
        todo.updated_at = Utc::now();

        self.repository.update(todo).await
    }

    async fn delete_todo(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError> {
        self.repository.delete(user_id, id).await?;
        tracing::debug!(user_id = %user_id, todo_id = %id, "Todo deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::todo::models::TodoTitle;

    mock! {
        pub TestTodoRepository {}

        #[async_trait]
        impl TodoRepository for TestTodoRepository {
            async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError>;
            async fn find_by_id(&self, user_id: &UserId, id: &TodoId) -> Result<Option<Todo>, TodoError>;
            async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError>;
            async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;
            async fn delete(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError>;
        }
    }

    fn test_todo(user_id: i64, id: i64) -> Todo {
        let now = Utc::now();
        Todo {
            id: TodoId(id),
            user_id: UserId(user_id),
            title: TodoTitle::new("buy milk".to_string()).unwrap(),
            content: String::new(),
            status: TodoStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_todo_is_pending_and_owned() {
        let mut repository = MockTestTodoRepository::new();

        repository
            .expect_create()
            .withf(|todo| todo.user_id == UserId(42) && todo.status == TodoStatus::Pending)
            .times(1)
            .returning(|todo| {
                Ok(Todo {
                    id: TodoId(1),
                    user_id: todo.user_id,
                    title: todo.title,
                    content: todo.content,
                    status: todo.status,
                    created_at: todo.created_at,
                    updated_at: todo.created_at,
                })
            });

        let service = TodoService::new(Arc::new(repository));
        let command = CreateTodoCommand {
            title: TodoTitle::new("buy milk".to_string()).unwrap(),
            content: "two litres".to_string(),
        };

        let todo = service.create_todo(&UserId(42), command).await.unwrap();
        assert_eq!(todo.id, TodoId(1));
        assert_eq!(todo.content, "two litres");
    }

    #[tokio::test]
    async fn test_get_todo_of_other_user_is_not_found() {
        let mut repository = MockTestTodoRepository::new();

        repository
            .expect_find_by_id()
            .with(eq(UserId(2)), eq(TodoId(9)))
            .times(1)
            .returning(|_, _| Ok(None));

        let service = TodoService::new(Arc::new(repository));

        let result = service.get_todo(&UserId(2), &TodoId(9)).await;
        assert!(matches!(result, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_todo_replaces_fields() {
        let mut repository = MockTestTodoRepository::new();
        let existing = test_todo(42, 5);
        let created_at = existing.created_at;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(move |todo| todo.updated_at >= created_at)
            .times(1)
            .returning(|todo| Ok(todo));

        let service = TodoService::new(Arc::new(repository));
        let command = UpdateTodoCommand {
            title: TodoTitle::new("buy oat milk".to_string()).unwrap(),
            content: "one litre".to_string(),
            status: TodoStatus::Completed,
        };

        let todo = service
            .update_todo(&UserId(42), &TodoId(5), command)
            .await
            .unwrap();
        assert_eq!(todo.title.as_str(), "buy oat milk");
        assert_eq!(todo.status, TodoStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_missing_todo_skips_write() {
        let mut repository = MockTestTodoRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_, _| Ok(None));
        repository.expect_update().never();

        let service = TodoService::new(Arc::new(repository));
        let command = UpdateTodoCommand {
            title: TodoTitle::new("anything".to_string()).unwrap(),
            content: String::new(),
            status: TodoStatus::Pending,
        };

        let result = service.update_todo(&UserId(1), &TodoId(1), command).await;
        assert!(matches!(result, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_todos() {
        let mut repository = MockTestTodoRepository::new();

        repository
            .expect_list_by_user()
            .with(eq(UserId(42)))
            .times(1)
            .returning(|_| Ok(vec![test_todo(42, 1), test_todo(42, 2)]));

        let service = TodoService::new(Arc::new(repository));

        let todos = service.list_todos(&UserId(42)).await.unwrap();
        assert_eq!(todos.len(), 2);
    }
}
