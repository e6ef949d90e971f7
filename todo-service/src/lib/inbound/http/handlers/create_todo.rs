use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TodoData;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::todo::errors::TodoError;

pub async fn create_todo(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Json(body): Json<CreateTodoRequest>,
) -> Result<ApiSuccess<TodoData>, ApiError> {
    let user_id = caller.user_id()?;
    let command = body.try_into_command()?;

    state
        .todo_service
        .create_todo(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::CREATED, todo.into()))
}

/// HTTP request body for creating a todo (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTodoRequest {
    title: String,
    #[serde(default)]
    content: String,
}

impl CreateTodoRequest {
    fn try_into_command(self) -> Result<CreateTodoCommand, TodoError> {
        Ok(CreateTodoCommand {
            title: TodoTitle::new(self.title)?,
            content: self.content,
        })
    }
}
