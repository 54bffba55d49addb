//! PostgreSQL-backed user directory.
//!
//! Roles and statuses are stored as text and parsed on read; see
//! `migrations/` for the table definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gerbang_models::{AccountStatus, User};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use super::directory::{DirectoryError, UserDirectory};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DirectoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect, then apply pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DirectoryError> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .map_err(sqlx::Error::from)?;
        info!("Database migrations applied");

        Ok(Self::new(db))
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DirectoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name, email");
        sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<User>, DirectoryError> {
        let query = format!(
            "UPDATE users SET status = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }
}
