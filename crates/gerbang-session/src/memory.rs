//! In-process session store.
//!
//! Records live in a map guarded by a [`RwLock`] and expire after their TTL.
//! Used by the `memory` driver and as the session double in tests.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::id::SessionId;
use crate::record::SessionRecord;
use crate::store::{SessionError, SessionStore};

/// Expiry used when `now + ttl` does not fit in an [`Instant`].
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included until the next save
    /// sweeps them.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        match entries.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.record.clone())),
            Some(_) => {
                entries.remove(id);
                debug!(session.id = %id, "Session expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        let now = Instant::now();
        let entry = Entry {
            record: record.clone(),
            expires_at: now
                .checked_add(ttl)
                .or_else(|| now.checked_add(MAX_TTL))
                .unwrap_or(now),
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }

        entries.insert(id.clone(), entry);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        Ok(())
    }
}
