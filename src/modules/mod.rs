//! Feature modules.
//!
//! - [`auth`]: Login and logout
//! - [`home`]: Landing page for any signed-in account
//! - [`admin`]: Administrator panel and account suspension
//! - [`users`]: Account storage

pub mod admin;
pub mod auth;
pub mod home;
pub mod users;
