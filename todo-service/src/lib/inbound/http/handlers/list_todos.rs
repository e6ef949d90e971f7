use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::TodoData;
use crate::domain::todo::ports::TodoServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<TodoData>>, ApiError> {
    let user_id = caller.user_id()?;

    state
        .todo_service
        .list_todos(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|todos| ApiSuccess::new(StatusCode::OK, todos.iter().map(TodoData::from).collect()))
}
