use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::todo::models::TodoId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::todo::errors::TodoError;
use crate::todo::ports::TodoServicePort;

pub async fn delete_todo(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user_id = caller.user_id()?;
    let todo_id = TodoId::from_string(&id).map_err(TodoError::from)?;

    state
        .todo_service
        .delete_todo(&user_id, &todo_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
