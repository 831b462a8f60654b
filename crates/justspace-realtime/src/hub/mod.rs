//! The connection hub.
//!
//! All membership changes and publish fan-out are funneled through a single
//! dispatch task that exclusively owns the registry; callers interact with
//! it only through the message-passing operations on [`Hub`]. The registry
//! is never observed mid-mutation because nothing else can touch it, which
//! removes the need for any locking discipline around membership state.

mod dispatch;
mod registry;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

use justspace_core::config::RealtimeConfig;
use justspace_core::events::ChangeEvent;

use crate::connection::handle::{ConnectionHandle, ConnectionId};

/// Requests processed one at a time by the dispatch task.
pub(crate) enum HubCommand {
    Register(Arc<ConnectionHandle>),
    Unregister(ConnectionId),
    Publish {
        user_id: String,
        payload: String,
    },
    ConnectionCount(oneshot::Sender<usize>),
    UserConnectionCount {
        user_id: String,
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Handle to the process-wide connection hub.
///
/// Cheap to clone; every clone feeds the same dispatch task. One hub is
/// constructed at process startup and lives for the process lifetime.
#[derive(Clone)]
pub struct Hub {
    tx: mpsc::Sender<HubCommand>,
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub").finish()
    }
}

impl Hub {
    /// Creates the hub and spawns its dispatch task.
    pub fn new(config: &RealtimeConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.dispatch_queue_capacity);
        tokio::spawn(dispatch::run(rx));
        Self { tx }
    }

    /// Admits a connection into the membership registry.
    ///
    /// The connection is eligible for publishes from the moment the
    /// dispatch task processes the registration; nothing published earlier
    /// is redelivered.
    pub async fn register(&self, connection: Arc<ConnectionHandle>) {
        self.send(HubCommand::Register(connection)).await;
    }

    /// Removes a connection and closes its outbound queue.
    ///
    /// A no-op when the connection was already removed or never registered,
    /// so the read task and the eviction path can both call it safely.
    pub async fn unregister(&self, id: ConnectionId) {
        self.send(HubCommand::Unregister(id)).await;
    }

    /// Publishes an event to every connection of `user_id`.
    ///
    /// The event is serialized once and the identical payload enqueued on
    /// each matching connection's queue. Serialization failure drops the
    /// publish entirely — delivery is best-effort and never surfaces to the
    /// caller. The call may wait briefly for space in the dispatch queue
    /// but never waits on a slow receiver.
    pub async fn publish(&self, user_id: &str, event: &ChangeEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to serialize change event, dropping publish"
                );
                return;
            }
        };

        self.send(HubCommand::Publish {
            user_id: user_id.to_string(),
            payload,
        })
        .await;
    }

    /// Total number of registered connections.
    pub async fn connection_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::ConnectionCount(reply)).await;
        rx.await.unwrap_or(0)
    }

    /// Number of registered connections for one user.
    pub async fn user_connection_count(&self, user_id: &str) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::UserConnectionCount {
            user_id: user_id.to_string(),
            reply,
        })
        .await;
        rx.await.unwrap_or(0)
    }

    /// Closes every connection's queue and stops the dispatch task.
    pub async fn shutdown(&self) {
        self.send(HubCommand::Shutdown).await;
    }

    async fn send(&self, command: HubCommand) {
        if self.tx.send(command).await.is_err() {
            warn!("Hub dispatch task is no longer running, dropping command");
        }
    }
}
