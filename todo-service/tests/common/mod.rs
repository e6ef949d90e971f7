use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Identity;
use auth::PasswordHasher;
use auth::Secret;
use auth::TokenCodec;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use todo_service::config::AdminConfig;
use todo_service::domain::todo::service::TodoService;
use todo_service::domain::user::service::UserService;
use todo_service::inbound::http::router::create_router;
use todo_service::todo::errors::TodoError;
use todo_service::todo::models::NewTodo;
use todo_service::todo::models::Todo;
use todo_service::todo::models::TodoId;
use todo_service::todo::ports::TodoRepository;
use todo_service::user::errors::UserError;
use todo_service::user::models::EmailAddress;
use todo_service::user::models::NewUser;
use todo_service::user::models::User;
use todo_service::user::models::UserId;
use todo_service::user::ports::UserRepository;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass_word!";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    /// Codec sharing the server's secret, for forging tokens in tests
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_service = Arc::new(UserService::new(Arc::new(InMemoryUserRepository::default())));
        let todo_service = Arc::new(TodoService::new(Arc::new(InMemoryTodoRepository::default())));

        let authenticator = Arc::new(Authenticator::new(
            Secret::new(TEST_SECRET).expect("Failed to create test secret"),
            Duration::minutes(15),
        ));

        let admin = AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password_hash: PasswordHasher::new()
                .hash(ADMIN_PASSWORD)
                .expect("Failed to hash admin password"),
        };

        let router = create_router(user_service, todo_service, authenticator, Some(admin));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let token_codec = TokenCodec::new(
            Secret::new(TEST_SECRET).expect("Failed to create test secret"),
            Duration::minutes(15),
        );

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            token_codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Sign up a user and return its id
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> i64 {
        let response = self
            .post("/api/v1/auth/signup")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return the issued bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Sign up and log in a fresh user
    pub async fn user_token(&self, name: &str, email: &str) -> (i64, String) {
        let id = self.signup(name, email, "pass_word!").await;
        (id, self.login(email, "pass_word!").await)
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Token for `subject_id` that expired at `expires_at`
    pub fn expired_token(&self, subject_id: i64, expires_at: DateTime<Utc>) -> String {
        let identity = Identity::user_until(subject_id, expires_at).expect("Invalid identity");
        self.token_codec.issue(&identity).expect("Failed to issue token")
    }
}

/// User storage with database-like id assignment and email uniqueness
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<i64, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let created = User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        users.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id.0)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

/// Todo storage keyed by id; lookups are scoped to the owner
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<BTreeMap<i64, Todo>>,
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError> {
        let mut todos = self.todos.lock().unwrap();
        let id = todos.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Todo {
            id: TodoId(id),
            user_id: todo.user_id,
            title: todo.title,
            content: todo.content,
            status: todo.status,
            created_at: todo.created_at,
            updated_at: todo.created_at,
        };
        todos.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, user_id: &UserId, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        Ok(self
            .todos
            .lock()
            .unwrap()
            .get(&id.0)
            .filter(|t| t.user_id == *user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        Ok(self
            .todos
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let mut todos = self.todos.lock().unwrap();
        match todos.get_mut(&todo.id.0) {
            Some(existing) if existing.user_id == todo.user_id => {
                *existing = todo.clone();
                Ok(todo)
            }
            _ => Err(TodoError::NotFound(todo.id.to_string())),
        }
    }

    async fn delete(&self, user_id: &UserId, id: &TodoId) -> Result<(), TodoError> {
        let mut todos = self.todos.lock().unwrap();
        match todos.get(&id.0) {
            Some(todo) if todo.user_id == *user_id => {
                todos.remove(&id.0);
                Ok(())
            }
            _ => Err(TodoError::NotFound(id.to_string())),
        }
    }
}
