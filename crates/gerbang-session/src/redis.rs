//! Redis-backed session store.
//!
//! Records are stored as JSON strings under `<prefix>:<session id>` with a
//! Redis expiry equal to the session lifetime.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, instrument};

use crate::id::SessionId;
use crate::record::SessionRecord;
use crate::store::{SessionError, SessionStore};

/// Redis session store with a shared connection manager.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Connection` if connection fails.
    pub async fn new(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self, SessionError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, id: &SessionId) -> String {
        format!("{}:{}", self.key_prefix, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip(self), fields(session.operation = "GET"))]
    async fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.conn.clone();
        let key = self.key(id);

        let Some(value) = conn.get::<_, Option<String>>(&key).await? else {
            debug!(session.key = %key, "Session not found");
            return Ok(None);
        };

        match serde_json::from_str(&value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // A record we cannot read is as good as no record.
                error!(session.key = %key, error = %e, "Failed to deserialize session");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, record), fields(session.operation = "SETEX"))]
    async fn save(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let key = self.key(id);
        let json = serde_json::to_string(record)?;

        // SETEX rejects a zero expiry.
        conn.set_ex::<_, _, ()>(&key, json, ttl.as_secs().max(1))
            .await?;

        debug!(session.key = %key, session.ttl_secs = %ttl.as_secs(), "Session saved");

        Ok(())
    }

    #[instrument(skip(self), fields(session.operation = "DEL"))]
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let key = self.key(id);

        conn.del::<_, ()>(&key).await?;

        debug!(session.key = %key, "Session destroyed");

        Ok(())
    }
}
