//! TOML-based configuration for Warden
//!
//! Server, authentication, database and seed-user settings are read from a
//! TOML file (`warden.toml`). Secrets never live in the file itself: the
//! `[auth]` section names the environment variable that holds the signing
//! secret.
//!
//! The configuration is read once at startup. There is no hot reload, since
//! the signing key must stay fixed for the life of the process.

use crate::auth::password::is_phc_hash;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum accepted length of the signing secret, in bytes (HS256 key size).
pub const MIN_SECRET_BYTES: usize = 32;

/// Longest accepted token validity: ten years, in seconds.
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Root configuration structure loaded from warden.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Users inserted into the store at startup when absent
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Token validity in seconds
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry: i64,

    /// The only path on which credentials are exchanged for a token
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_jwt_expiry() -> i64 {
    3600
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            jwt_expiry: default_jwt_expiry(),
            login_path: default_login_path(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// libsql database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    ":memory:".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

// ============= Seed Users =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,

    /// Argon2 PHC string, see `warden-server hash-password`
    pub password_hash: String,

    pub roles: Vec<String>,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl WardenConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: WardenConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate internal consistency and the availability of the signing secret
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt_secret()?;

        if self.auth.jwt_expiry <= 0 || self.auth.jwt_expiry > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::ValidationError(format!(
                "auth.jwt_expiry must be between 1 and {} seconds, got {}",
                MAX_TOKEN_TTL_SECS, self.auth.jwt_expiry
            )));
        }

        if !self.auth.login_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "auth.login_path must start with '/', got '{}'",
                self.auth.login_path
            )));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Seed user with empty username".to_string(),
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Seed user '{}' is defined more than once",
                    user.username
                )));
            }
            if user.roles.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Seed user '{}' must have at least one role",
                    user.username
                )));
            }
            if !is_phc_hash(&user.password_hash) {
                return Err(ConfigError::ValidationError(format!(
                    "Seed user '{}' has a password_hash that is not a PHC string",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let secret = std::env::var(&self.auth.jwt_secret_env)
            .map_err(|_| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))?;

        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::ValidationError(format!(
                "Secret in '{}' must be at least {} bytes",
                self.auth.jwt_secret_env, MIN_SECRET_BYTES
            )));
        }

        Ok(secret)
    }

    /// `host:port` the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
