use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::todo::models::NewTodo;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoRepository;
use crate::todo::errors::TodoError;
use crate::user::models::UserId;

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TodoRow {
    id: i64,
    user_id: i64,
    title: String,
    content: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId(row.id),
            user_id: UserId(row.user_id),
            title: TodoTitle::new(row.title)?,
            content: row.content,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (user_id, title, content, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, user_id, title, content, status, created_at, updated_at
            "#,
        )
        .bind(todo.user_id.0)
        .bind(todo.title.as_str())
        .bind(&todo.content)
        .bind(todo.status.as_str())
        .bind(todo.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.try_into()
    }

    async fn find_by_id(&self, user_id: &UserId, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, content, status, created_at, updated_at
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.map(Todo::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, content, status, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET title = $3, content = $4, status = $5, updated_at = $6
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, content, status, created_at, updated_at
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.user_id.0)
        .bind(todo.title.as_str())
        .bind(&todo.content)
        .bind(todo.status.as_str())
        .bind(todo.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.ok_or(TodoError::NotFound(todo.id.to_string()))?
            .try_into()
    }

    async fn delete(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
