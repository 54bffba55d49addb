//! Storage abstraction for session records.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::id::SessionId;
use crate::record::SessionRecord;

/// Error type for session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Backend that persists [`SessionRecord`]s by [`SessionId`].
///
/// Implementations own their consistency. Every method is idempotent:
/// destroying a missing session or saving the same record twice is fine.
#[async_trait]
pub trait SessionStore: Debug + Send + Sync + 'static {
    /// Fetch a live record. Expired or unknown ids yield `Ok(None)`.
    async fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError>;

    /// Write a record, resetting its idle expiry to `ttl`.
    async fn save(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionError>;

    /// Remove a record.
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError>;
}
