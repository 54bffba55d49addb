use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use gerbang_config::{DatabaseConfig, SessionConfig, SessionDriver};
use gerbang_core::hash_password;
use gerbang_models::{AccountStatus, User, UserRole};
use gerbang_session::SessionManager;
use tracing::{info, warn};
use uuid::Uuid;

use crate::modules::users::{MemoryUserDirectory, PgUserDirectory, UserDirectory};

#[derive(Clone, Debug)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(users: Arc<dyn UserDirectory>, sessions: SessionManager) -> Self {
        Self { users, sessions }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let session_config = SessionConfig::from_env();
    let sessions = match session_config.driver {
        SessionDriver::Memory => {
            info!("Using in-memory session store");
            SessionManager::memory(session_config)
        }
        SessionDriver::Redis => {
            info!(redis.url = %session_config.redis_url, "Using Redis session store");
            SessionManager::redis(session_config)
                .await
                .context("Failed to connect to Redis")?
        }
    };

    let database = DatabaseConfig::from_env();
    let users: Arc<dyn UserDirectory> = match &database.url {
        Some(url) => Arc::new(
            PgUserDirectory::connect(url, database.max_connections)
                .await
                .context("Failed to connect to database")?,
        ),
        None => Arc::new(seeded_memory_directory(&database)?),
    };

    Ok(AppState::new(users, sessions))
}

fn seeded_memory_directory(config: &DatabaseConfig) -> anyhow::Result<MemoryUserDirectory> {
    warn!("DATABASE_URL not set, accounts are kept in memory");
    let directory = MemoryUserDirectory::new();

    let (Some(email), Some(password)) = (&config.seed_admin_email, &config.seed_admin_password)
    else {
        warn!("SEED_ADMIN_EMAIL / SEED_ADMIN_PASSWORD not set, nobody can log in");
        return Ok(directory);
    };

    let now = Utc::now();
    directory.insert(User {
        id: Uuid::new_v4(),
        name: "Administrator".to_string(),
        email: email.clone(),
        password_hash: hash_password(password).map_err(|e| e.error)?,
        role: UserRole::Admin,
        status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
    });
    info!(user.email = %email, "Seeded administrator account");

    Ok(directory)
}
