//! Session identifiers and random tokens.

use std::fmt;

use rand::{Rng, distributions::Alphanumeric};

/// Length of session identifiers and anti-forgery tokens.
pub const TOKEN_LENGTH: usize = 40;

/// Generate a random alphanumeric string of [`TOKEN_LENGTH`] characters.
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Opaque session identifier carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(random_token())
    }

    /// Accept a cookie value only if it has the shape of an identifier we
    /// issued. Anything else is treated as no session at all.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == TOKEN_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
