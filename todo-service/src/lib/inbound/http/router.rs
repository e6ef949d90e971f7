use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_todo::create_todo;
use super::handlers::delete_todo::delete_todo;
use super::handlers::delete_user::delete_user;
use super::handlers::get_todo::get_todo;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::list_todos::list_todos;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::signup::signup;
use super::handlers::update_todo::update_todo;
use super::middleware::require_admin;
use super::middleware::require_user;
use crate::config::AdminConfig;
use crate::todo::ports::TodoServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub todo_service: Arc<dyn TodoServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub admin: Option<Arc<AdminConfig>>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    todo_service: Arc<dyn TodoServicePort>,
    authenticator: Arc<Authenticator>,
    admin: Option<AdminConfig>,
) -> Router {
    let state = AppState {
        user_service,
        todo_service,
        authenticator,
        admin: admin.map(Arc::new),
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login));

    let admin_routes = Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:user_id", get(get_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let user_routes = Router::new()
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/:todo_id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(user_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
