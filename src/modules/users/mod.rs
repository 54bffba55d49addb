//! User accounts: the [`UserDirectory`](directory::UserDirectory) trait and
//! its in-memory and PostgreSQL implementations.

pub mod directory;
pub mod postgres;

pub use directory::{DirectoryError, MemoryUserDirectory, UserDirectory};
pub use postgres::PgUserDirectory;
