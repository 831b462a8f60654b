//! Individual realtime connection handle.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique connection identifier, minted at accept time.
pub type ConnectionId = Uuid;

/// A handle to a single live connection.
///
/// Holds the producer end of the connection's bounded outbound queue plus
/// the user it was authenticated as. The hub's dispatch task is the only
/// enqueuer; the connection's write task owns the consumer end returned by
/// [`ConnectionHandle::new`].
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Authenticated user this connection belongs to.
    pub user_id: String,
    /// Sender for serialized outbound payloads. Taken exactly once on
    /// close, after which the write task drains the queue and exits.
    sender: Mutex<Option<mpsc::Sender<String>>>,
}

/// Outcome of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The payload was queued for the write task.
    Enqueued,
    /// The queue is full — the receiver is not draining fast enough.
    Full,
    /// The queue has already been closed.
    Closed,
}

impl ConnectionHandle {
    /// Creates a handle with a bounded outbound queue, returning the
    /// consumer end for the connection's write task.
    pub fn new(
        user_id: impl Into<String>,
        queue_capacity: usize,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(queue_capacity);
        let handle = Arc::new(Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            sender: Mutex::new(Some(tx)),
        });
        (handle, rx)
    }

    /// Attempts to enqueue a payload without blocking.
    pub fn try_send(&self, payload: String) -> EnqueueOutcome {
        let Ok(guard) = self.sender.lock() else {
            return EnqueueOutcome::Closed;
        };
        match guard.as_ref() {
            None => EnqueueOutcome::Closed,
            Some(tx) => match tx.try_send(payload) {
                Ok(()) => EnqueueOutcome::Enqueued,
                Err(mpsc::error::TrySendError::Full(_)) => EnqueueOutcome::Full,
                Err(mpsc::error::TrySendError::Closed(_)) => EnqueueOutcome::Closed,
            },
        }
    }

    /// Closes the outbound queue. The write task drains whatever is still
    /// queued and then exits. Idempotent.
    pub fn close(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
    }

    /// Whether the outbound queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }
}
