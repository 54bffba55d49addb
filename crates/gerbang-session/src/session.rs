//! The per-request session handle.
//!
//! A [`Session`] is cloned into request extensions by the session middleware.
//! All clones share one state; the middleware persists it after the handler
//! returns. Operations that replace the session id destroy the old record in
//! the store right away, so a leaked cookie stops working immediately.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

use crate::id::{SessionId, random_token};
use crate::record::{FlashBag, SessionRecord};
use crate::store::{SessionError, SessionStore};

#[derive(Debug)]
struct SessionState {
    id: SessionId,
    record: SessionRecord,
    /// Flash data written by the previous request.
    incoming: FlashBag,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// A brand new anonymous session.
    pub fn start(store: Arc<dyn SessionStore>) -> Self {
        Self::from_parts(store, SessionId::generate(), SessionRecord::new())
    }

    /// Resume a stored session. Its pending flash data becomes readable and is
    /// cleared from the record that will be saved back.
    pub fn resume(store: Arc<dyn SessionStore>, id: SessionId, record: SessionRecord) -> Self {
        Self::from_parts(store, id, record)
    }

    fn from_parts(store: Arc<dyn SessionStore>, id: SessionId, mut record: SessionRecord) -> Self {
        let incoming = std::mem::take(&mut record.flash);
        Self {
            state: Arc::new(Mutex::new(SessionState {
                id,
                record,
                incoming,
            })),
            store,
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> SessionId {
        self.state().id.clone()
    }

    /// Current anti-forgery token.
    pub fn token(&self) -> String {
        self.state().record.csrf_token.clone()
    }

    /// Authenticated account id, if any.
    pub fn user_id(&self) -> Option<Uuid> {
        self.state().record.user_id
    }

    /// Bind the session to an account. The session id and token are rotated
    /// to prevent fixation.
    pub async fn login(&self, user_id: Uuid) -> Result<(), SessionError> {
        self.migrate().await?;
        self.regenerate_token();
        self.state().record.user_id = Some(user_id);
        Ok(())
    }

    /// Forget the authenticated account. The session itself stays alive.
    pub fn logout(&self) {
        self.state().record.user_id = None;
    }

    /// Destroy the stored session and continue with an empty one under a new
    /// id. Flash data already received by this request stays readable.
    pub async fn invalidate(&self) -> Result<(), SessionError> {
        let old_id = {
            let mut state = self.state();
            state.record = SessionRecord::new();
            std::mem::replace(&mut state.id, SessionId::generate())
        };

        self.store.destroy(&old_id).await?;
        debug!(session.id = %old_id, "Session invalidated");
        Ok(())
    }

    /// Move the session data to a new id, destroying the old record.
    pub async fn migrate(&self) -> Result<(), SessionError> {
        let old_id = {
            let mut state = self.state();
            std::mem::replace(&mut state.id, SessionId::generate())
        };

        self.store.destroy(&old_id).await?;
        debug!(session.id = %old_id, "Session migrated");
        Ok(())
    }

    /// Issue a fresh anti-forgery token and return it.
    pub fn regenerate_token(&self) -> String {
        let token = random_token();
        self.state().record.csrf_token = token.clone();
        token
    }

    /// Compare a submitted token against the session's, in constant time with
    /// respect to the token contents.
    pub fn verify_token(&self, candidate: &str) -> bool {
        let expected = self.token();
        expected.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    /// Flash an error message for `field` to the next request.
    pub fn flash_error(&self, field: impl Into<String>, message: impl Into<String>) {
        self.state()
            .record
            .flash
            .errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Flash a whole error bag to the next request.
    pub fn flash_errors(&self, errors: BTreeMap<String, Vec<String>>) {
        let mut state = self.state();
        for (field, messages) in errors {
            state
                .record
                .flash
                .errors
                .entry(field)
                .or_default()
                .extend(messages);
        }
    }

    /// Flash a form value so the next request can re-fill the form.
    pub fn flash_old(&self, field: impl Into<String>, value: impl Into<String>) {
        self.state()
            .record
            .flash
            .old
            .insert(field.into(), value.into());
    }

    /// Errors flashed by the previous request.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.state().incoming.errors.clone()
    }

    /// First error flashed for `field` by the previous request.
    pub fn error(&self, field: &str) -> Option<String> {
        self.state().incoming.first_error(field).map(str::to_string)
    }

    /// Form value flashed by the previous request.
    pub fn old(&self, field: &str) -> Option<String> {
        self.state().incoming.old.get(field).cloned()
    }

    /// Errors flashed during this request, waiting for the next one.
    pub fn pending_errors(&self) -> BTreeMap<String, Vec<String>> {
        self.state().record.flash.errors.clone()
    }

    /// Persist the session under its current id.
    pub async fn save(&self, ttl: Duration) -> Result<(), SessionError> {
        let (id, record) = {
            let mut state = self.state();
            state.record.last_seen_at = Utc::now();
            (state.id.clone(), state.record.clone())
        };

        self.store.save(&id, &record, ttl).await
    }
}
