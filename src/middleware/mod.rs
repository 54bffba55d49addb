//! Middleware and extractors for the inbound request pipeline.
//!
//! - [`auth`]: Resolves the session to a [`Principal`](gerbang_models::Principal)
//!   and provides the [`AuthUser`](auth::AuthUser) extractor
//! - [`status`]: Logs out suspended accounts
//! - [`role`]: Lets only administrators through
//! - [`csrf`]: Anti-forgery token checks
//!
//! # Pipeline
//!
//! 1. `session_middleware` loads the session from its cookie
//! 2. [`auth::authenticate`] attaches the current principal, if any
//! 3. [`status::check_account_status`] ends the session of a suspended account
//! 4. [`role::require_admin`] or [`auth::require_auth`] guards the route
//! 5. The handler runs
//!
//! The status gate sits in front of the role gate, so a suspended
//! administrator is logged out rather than merely refused.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use crate::middleware::{role::require_admin, status::check_account_status};
//!
//! let admin_routes = Router::new()
//!     .route("/admin", get(admin_home))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn(check_account_status));
//! ```

pub mod auth;
pub mod csrf;
pub mod role;
pub mod status;
