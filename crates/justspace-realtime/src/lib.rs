//! # justspace-realtime
//!
//! Realtime change-notification engine for justspace. Provides:
//!
//! - the connection hub: a single dispatch task that exclusively owns the
//!   membership registry and serializes all register/unregister/publish
//!   traffic
//! - per-connection handles with bounded outbound queues and a
//!   drop-slow-receivers backpressure policy
//! - accept-time JWT authentication for inbound connections

pub mod connection;
pub mod hub;

pub use connection::authenticator::WsAuthenticator;
pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use hub::Hub;
