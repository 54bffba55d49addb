//! # Gerbang Models
//!
//! Domain types shared by the session, authentication and gate code.
//!
//! - [`users`]: [`User`] records, the request-scoped [`Principal`], and the
//!   [`UserRole`] / [`AccountStatus`] enums the gates match on.

pub mod users;

// Re-export commonly used types at crate root
pub use users::{AccountStatus, ParseEnumError, Principal, User, UserRole};
