//! Membership registry — the authoritative record of live connections.

use std::collections::HashMap;
use std::sync::Arc;

use crate::connection::handle::{ConnectionHandle, ConnectionId};

/// Live connections indexed by owning user and by connection ID.
///
/// Owned exclusively by the dispatch task; no other component reads or
/// mutates it. The registry only ever holds connection handles (subject +
/// queue sender), never sockets or tasks, so membership does not extend a
/// stream's lifetime.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    /// User ID → connections. One user can have several devices connected;
    /// a user with no connections has no entry at all.
    by_user: HashMap<String, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle for direct lookup.
    by_id: HashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. A connection already present is left untouched,
    /// preserving the at-most-once membership invariant.
    pub(crate) fn insert(&mut self, handle: Arc<ConnectionHandle>) {
        if self.by_id.contains_key(&handle.id) {
            return;
        }
        self.by_id.insert(handle.id, Arc::clone(&handle));
        self.by_user
            .entry(handle.user_id.clone())
            .or_default()
            .push(handle);
    }

    /// Removes a connection, returning its handle if it was present.
    pub(crate) fn remove(&mut self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let handle = self.by_id.remove(id)?;
        if let Some(connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *id);
            if connections.is_empty() {
                self.by_user.remove(&handle.user_id);
            }
        }
        Some(handle)
    }

    /// All connections registered for a user.
    pub(crate) fn user_connections(&self, user_id: &str) -> &[Arc<ConnectionHandle>] {
        self.by_user.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of connections registered for a user.
    pub(crate) fn user_connection_count(&self, user_id: &str) -> usize {
        self.user_connections(user_id).len()
    }

    /// Total number of registered connections.
    pub(crate) fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Removes and returns every connection (shutdown path).
    pub(crate) fn drain(&mut self) -> Vec<Arc<ConnectionHandle>> {
        self.by_user.clear();
        self.by_id.drain().map(|(_, handle)| handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn handle(user_id: &str) -> Arc<ConnectionHandle> {
        ConnectionHandle::new(user_id, 4).0
    }

    #[test]
    fn test_matches_reference_model() {
        // The registry must track exactly the registered-but-not-yet-
        // unregistered set, whatever the interleaving.
        let handles: Vec<_> = ["u1", "u1", "u2", "u3", "u2", "u1"]
            .iter()
            .map(|u| handle(u))
            .collect();

        let mut registry = Registry::new();
        let mut model: HashSet<ConnectionId> = HashSet::new();

        // (index, register?) operation sequence, including a re-remove and
        // a remove of a never-registered connection.
        let ops = [
            (0, true),
            (1, true),
            (2, true),
            (1, false),
            (1, false),
            (3, true),
            (4, true),
            (0, false),
            (5, true),
            (5, false),
            (2, false),
        ];

        for (i, register) in ops {
            if register {
                registry.insert(Arc::clone(&handles[i]));
                model.insert(handles[i].id);
            } else {
                registry.remove(&handles[i].id);
                model.remove(&handles[i].id);
            }
            assert_eq!(registry.connection_count(), model.len());
            for h in &handles {
                let expected = usize::from(model.contains(&h.id));
                let present = registry
                    .user_connections(&h.user_id)
                    .iter()
                    .filter(|c| c.id == h.id)
                    .count();
                assert_eq!(present, expected);
            }
        }
    }

    #[test]
    fn test_duplicate_insert_ignored() {
        let mut registry = Registry::new();
        let h = handle("u1");
        registry.insert(Arc::clone(&h));
        registry.insert(Arc::clone(&h));
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.user_connection_count("u1"), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = Registry::new();
        assert!(registry.remove(&uuid::Uuid::new_v4()).is_none());

        let h = handle("u1");
        registry.insert(Arc::clone(&h));
        assert!(registry.remove(&h.id).is_some());
        assert!(registry.remove(&h.id).is_none());
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn test_empty_user_entry_pruned() {
        let mut registry = Registry::new();
        let h = handle("u1");
        registry.insert(Arc::clone(&h));
        registry.remove(&h.id);
        // No lingering empty vec for the user.
        assert!(registry.user_connections("u1").is_empty());
        assert_eq!(registry.user_connection_count("u1"), 0);
    }
}
