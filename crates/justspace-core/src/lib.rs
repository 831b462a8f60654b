//! # justspace-core
//!
//! Core crate for the justspace backend. Contains configuration schemas,
//! the change-event record pushed over realtime connections, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other justspace crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
