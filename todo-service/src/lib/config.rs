use std::env;

use auth::Secret;
use auth::SecretError;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    /// Token signing secret. Required, no default.
    pub secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    pub admin: Option<AdminConfig>,
}

/// Credentials of the single administrator account.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub email: String,
    /// PHC string produced by `auth::PasswordHasher`
    pub password_hash: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_http_port() -> u16 {
    8080
}

fn default_token_ttl_minutes() -> i64 {
    15
}

/// Upper bound for `auth.token_ttl_minutes` (one day).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 24 * 60;

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET=... overrides auth.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    /// * `Message` - Token lifetime is out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.token_ttl()?;
        Ok(())
    }
}

impl AuthConfig {
    /// Build the signing secret.
    ///
    /// # Errors
    /// * `Empty` - Secret is configured but blank
    pub fn signing_secret(&self) -> Result<Secret, SecretError> {
        Secret::new(self.secret.trim().as_bytes())
    }

    /// Lifetime of tokens issued at login.
    ///
    /// # Errors
    /// * `Message` - Not between 1 and `MAX_TOKEN_TTL_MINUTES` minutes
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_minutes must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_MINUTES, self.token_ttl_minutes
            )));
        }
        Ok(Duration::minutes(self.token_ttl_minutes))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("admin", &self.admin.as_ref().map(|admin| &admin.email))
            .finish()
    }
}
