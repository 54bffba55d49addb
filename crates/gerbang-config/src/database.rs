//! User directory configuration.
//!
//! When `DATABASE_URL` is set, users are read from PostgreSQL. Without it the
//! server keeps users in memory and seeds a single administrator from
//! `SEED_ADMIN_EMAIL` / `SEED_ADMIN_PASSWORD`, which is handy for local runs.

use std::env;

#[derive(Clone, Debug, Default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string.
    pub url: Option<String>,
    /// Maximum pool size.
    pub max_connections: u32,
    /// Email of the administrator seeded into the in-memory directory.
    pub seed_admin_email: Option<String>,
    /// Plain-text password of the seeded administrator. Hashed on startup.
    pub seed_admin_password: Option<String>,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            seed_admin_email: env::var("SEED_ADMIN_EMAIL").ok(),
            seed_admin_password: env::var("SEED_ADMIN_PASSWORD").ok(),
        }
    }
}
