//! # Gerbang Session
//!
//! Server-side sessions identified by a cookie.
//!
//! - [`id`]: Session identifiers and random token generation
//! - [`record`]: The persisted session payload, flash data included
//! - [`store`]: The [`SessionStore`] trait and its error type
//! - [`memory`]: In-process store, also the test double
//! - [`redis`]: Redis-backed store for multi-instance deployments
//! - [`session`]: The per-request [`Session`] handle
//! - [`middleware`]: The axum layer that loads and persists sessions
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use gerbang_config::SessionConfig;
//! use gerbang_session::{SessionManager, session_middleware};
//!
//! let manager = SessionManager::memory(SessionConfig::from_env());
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(middleware::from_fn_with_state(manager, session_middleware));
//! ```

pub mod id;
pub mod memory;
pub mod middleware;
pub mod record;
pub mod redis;
pub mod session;
pub mod store;

pub use id::SessionId;
pub use memory::MemorySessionStore;
pub use middleware::{SessionManager, session_middleware};
pub use record::{FlashBag, SessionRecord};
pub use redis::RedisSessionStore;
pub use session::Session;
pub use store::{SessionError, SessionStore};
