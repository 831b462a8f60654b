//! The dispatch loop — single owner of the membership registry.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::handle::EnqueueOutcome;

use super::HubCommand;
use super::registry::Registry;

/// Processes hub commands one at a time until a shutdown command arrives
/// or every [`Hub`](super::Hub) clone has been dropped.
pub(crate) async fn run(mut rx: mpsc::Receiver<HubCommand>) {
    let mut registry = Registry::new();

    while let Some(command) = rx.recv().await {
        match command {
            HubCommand::Register(handle) => {
                info!(
                    conn_id = %handle.id,
                    user_id = %handle.user_id,
                    "Realtime connection registered"
                );
                registry.insert(handle);
            }
            HubCommand::Unregister(id) => {
                if let Some(handle) = registry.remove(&id) {
                    handle.close();
                    info!(
                        conn_id = %id,
                        user_id = %handle.user_id,
                        "Realtime connection unregistered"
                    );
                }
            }
            HubCommand::Publish { user_id, payload } => {
                publish(&mut registry, &user_id, payload);
            }
            HubCommand::ConnectionCount(reply) => {
                let _ = reply.send(registry.connection_count());
            }
            HubCommand::UserConnectionCount { user_id, reply } => {
                let _ = reply.send(registry.user_connection_count(&user_id));
            }
            HubCommand::Shutdown => break,
        }
    }

    let drained = registry.drain();
    for handle in &drained {
        handle.close();
    }
    if !drained.is_empty() {
        info!(count = drained.len(), "Closed all realtime connections");
    }
    debug!("Hub dispatch loop stopped");
}

/// Fans one serialized payload out to every connection of `user_id`.
///
/// Enqueueing never blocks: a connection whose queue is full or already
/// closed is evicted from the registry and its queue closed, instead of
/// stalling the publisher or buffering without bound.
fn publish(registry: &mut Registry, user_id: &str, payload: String) {
    let mut evicted = Vec::new();
    for handle in registry.user_connections(user_id) {
        match handle.try_send(payload.clone()) {
            EnqueueOutcome::Enqueued => {}
            EnqueueOutcome::Full => {
                warn!(
                    conn_id = %handle.id,
                    user_id = %user_id,
                    "Outbound queue full, evicting slow connection"
                );
                evicted.push(handle.id);
            }
            EnqueueOutcome::Closed => {
                evicted.push(handle.id);
            }
        }
    }
    for id in evicted {
        if let Some(handle) = registry.remove(&id) {
            handle.close();
        }
    }
}
