use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TodoData;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::todo::errors::TodoError;

/// HTTP request body for replacing a todo (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub status: String,
}

impl UpdateTodoRequest {
    fn try_into_command(self) -> Result<UpdateTodoCommand, TodoError> {
        Ok(UpdateTodoCommand {
            title: TodoTitle::new(self.title)?,
            content: self.content,
            status: self.status.parse()?,
        })
    }
}

pub async fn update_todo(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<ApiSuccess<TodoData>, ApiError> {
    let user_id = caller.user_id()?;
    let todo_id = TodoId::from_string(&id).map_err(TodoError::from)?;
    let command = req.try_into_command()?;

    state
        .todo_service
        .update_todo(&user_id, &todo_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, todo.into()))
}
