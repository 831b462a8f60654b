//! Application state shared across all handlers.

use std::sync::Arc;

use justspace_core::config::AppConfig;
use justspace_realtime::{Hub, WsAuthenticator};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Connection hub
    pub hub: Hub,
    /// Accept-time authenticator for realtime connections
    pub authenticator: WsAuthenticator,
}
