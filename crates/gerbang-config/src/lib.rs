//! # Gerbang Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`server`]: Listen address
//! - [`session`]: Session cookie and storage driver
//! - [`database`]: Optional PostgreSQL connection and the fallback admin seed
//!
//! # Example
//!
//! ```ignore
//! use gerbang_config::{DatabaseConfig, ServerConfig, SessionConfig};
//!
//! let server = ServerConfig::from_env();
//! let session = SessionConfig::from_env();
//! let database = DatabaseConfig::from_env();
//! ```

pub mod database;
pub mod server;
pub mod session;

// Re-export commonly used types at crate root
pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use session::{MAX_LIFETIME_MINUTES, SessionConfig, SessionDriver};
