//! # justspace-api
//!
//! Axum surface for the justspace realtime backend: the authenticated
//! `/api/ws` upgrade endpoint plus health checks. Domain CRUD handlers
//! live elsewhere; they reach connected clients through
//! [`Hub::publish`](justspace_realtime::Hub::publish) in-process.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
