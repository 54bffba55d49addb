//! Persisted session payload.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::random_token;

/// Data that lives for exactly one follow-up request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashBag {
    /// Field-scoped error messages, e.g. `email -> ["..."]`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
    /// Previous form input, so forms can be re-filled after a redirect.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub old: BTreeMap<String, String>,
}

impl FlashBag {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.old.is_empty()
    }

    /// First error recorded for `field`.
    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

/// Everything stored server-side for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Anti-forgery token expected back on state-changing requests.
    pub csrf_token: String,
    /// Authenticated account, if any.
    pub user_id: Option<Uuid>,
    /// Flash data written during this request, read during the next one.
    #[serde(default)]
    pub flash: FlashBag,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl SessionRecord {
    /// An anonymous record with a fresh token.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            csrf_token: random_token(),
            user_id: None,
            flash: FlashBag::default(),
            created_at: now,
            last_seen_at: now,
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}
