//! Realtime hub configuration.

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connection's private outbound queue. A connection
    /// whose queue fills up is evicted rather than buffered further.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue_capacity: usize,
    /// Capacity of the hub's dispatch command queue, shared by all
    /// register/unregister/publish callers.
    #[serde(default = "default_dispatch_queue")]
    pub dispatch_queue_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue(),
            dispatch_queue_capacity: default_dispatch_queue(),
        }
    }
}

fn default_outbound_queue() -> usize {
    256
}

fn default_dispatch_queue() -> usize {
    256
}
