//! Session configuration.

use std::env;
use std::time::Duration;

/// Where session records are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionDriver {
    /// In-process map. Sessions are lost on restart.
    Memory,
    /// Redis, shared between instances.
    Redis,
}

impl SessionDriver {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "array" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Session settings loaded from environment variables.
///
/// # Environment Variables
///
/// - `SESSION_DRIVER`: `memory` or `redis` (default: `memory`)
/// - `SESSION_COOKIE`: cookie name (default: `gerbang_session`)
/// - `SESSION_LIFETIME`: idle lifetime in minutes (default: `120`)
/// - `SESSION_SECURE_COOKIE`: send the cookie over HTTPS only (default: `false`)
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `SESSION_PREFIX`: Redis key prefix (default: `gerbang:session`)
/// Upper bound for `SESSION_LIFETIME`: one year.
pub const MAX_LIFETIME_MINUTES: u64 = 60 * 24 * 365;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub driver: SessionDriver,
    pub cookie_name: String,
    pub lifetime_minutes: u64,
    pub secure_cookie: bool,
    pub redis_url: String,
    pub key_prefix: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            driver: env::var("SESSION_DRIVER")
                .ok()
                .and_then(|v| SessionDriver::parse(&v))
                .unwrap_or(defaults.driver),
            cookie_name: env::var("SESSION_COOKIE").unwrap_or(defaults.cookie_name),
            lifetime_minutes: env::var("SESSION_LIFETIME")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(|minutes| minutes.min(MAX_LIFETIME_MINUTES))
                .unwrap_or(defaults.lifetime_minutes),
            secure_cookie: env::var("SESSION_SECURE_COOKIE")
                .ok()
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(defaults.secure_cookie),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("SESSION_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    /// Idle lifetime as a [`Duration`].
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_minutes.min(MAX_LIFETIME_MINUTES).saturating_mul(60))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            driver: SessionDriver::Memory,
            cookie_name: "gerbang_session".into(),
            lifetime_minutes: 120,
            secure_cookie: false,
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: "gerbang:session".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parse() {
        assert_eq!(SessionDriver::parse("redis"), Some(SessionDriver::Redis));
        assert_eq!(SessionDriver::parse(" Memory "), Some(SessionDriver::Memory));
        assert_eq!(SessionDriver::parse("array"), Some(SessionDriver::Memory));
        assert_eq!(SessionDriver::parse("file"), None);
    }

    #[test]
    fn test_lifetime_in_seconds() {
        let config = SessionConfig {
            lifetime_minutes: 2,
            ..SessionConfig::default()
        };
        assert_eq!(config.lifetime(), Duration::from_secs(120));
    }

    #[test]
    fn test_lifetime_is_capped() {
        let config = SessionConfig {
            lifetime_minutes: u64::MAX,
            ..SessionConfig::default()
        };
        assert_eq!(
            config.lifetime(),
            Duration::from_secs(MAX_LIFETIME_MINUTES * 60)
        );
    }
}
