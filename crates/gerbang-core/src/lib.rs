//! # Gerbang Core
//!
//! Core types, errors, and utilities shared by the Gerbang crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`negotiate`]: `Accept` header inspection for HTML vs JSON responses
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use gerbang_core::errors::AppError;
//! use gerbang_core::password::{hash_password, verify_password};
//!
//! let error = AppError::forbidden(anyhow::anyhow!("Admins only"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod negotiate;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use negotiate::prefers_html;
pub use password::{hash_password, hash_password_with_cost, verify_password};
