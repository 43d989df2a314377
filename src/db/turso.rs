use crate::db::traits::{User, UserStore};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};

/// libsql-backed user store.
///
/// Holds a single connection so that `:memory:` databases keep their
/// contents for the lifetime of the store.
pub struct TursoUserStore {
    _db: Database,
    conn: Connection,
}

impl TursoUserStore {
    /// Ephemeral in-memory database
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// File-based SQLite database (`:memory:` is accepted as well)
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    roles TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    async fn query_users(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<User>> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(user_from_row(&row)?);
        }

        Ok(users)
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    let roles: String = row.get(3).map_err(|e| AppError::Database(e.to_string()))?;
    let roles: Vec<String> = serde_json::from_str(&roles)
        .map_err(|e| AppError::Database(format!("Corrupt roles column: {}", e)))?;

    Ok(User {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        roles,
    })
}

#[async_trait]
impl UserStore for TursoUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self
            .query_users(
                "SELECT id, username, password_hash, roles FROM users WHERE username = ?",
                [username],
            )
            .await?;

        Ok(users.into_iter().next())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let users = self
            .query_users(
                "SELECT id, username, password_hash, roles FROM users WHERE id = ?",
                [id],
            )
            .await?;

        Ok(users.into_iter().next())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.query_users(
            "SELECT id, username, password_hash, roles FROM users ORDER BY id",
            (),
        )
        .await
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        roles: &[String],
    ) -> Result<User> {
        if username.is_empty() {
            return Err(AppError::InvalidInput("Username must not be empty".to_string()));
        }
        if roles.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "User '{}' must have at least one role",
                username
            )));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "User '{}' already exists",
                username
            )));
        }

        let roles_json = serde_json::to_string(roles)
            .map_err(|e| AppError::Internal(format!("Failed to encode roles: {}", e)))?;
        let now = Utc::now().timestamp();

        self.conn
            .execute(
                "INSERT INTO users (username, password_hash, roles, created_at)
                 VALUES (?, ?, ?, ?)",
                (username, password_hash, roles_json, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            roles: roles.to_vec(),
        })
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM users WHERE username = ?", [username])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(affected > 0)
    }
}
