//! Change events pushed to connected clients.
//!
//! Every mutation of a user-owned resource (a project, task, wiki guide,
//! snippet, access grant) produces a [`ChangeEvent`] that request handlers
//! hand to the realtime hub for fan-out to the owning user's live
//! connections.

use serde::{Deserialize, Serialize};

/// The kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A document was created.
    Create,
    /// A document was updated.
    Update,
    /// A document was deleted.
    Delete,
}

/// A change notification for one user's resource.
///
/// Field names on the wire match the contract consumed by the web client:
/// `type`, `collection`, `document`, `userId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened to the document.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Resource collection the document belongs to (e.g. `"tasks"`).
    pub collection: String,
    /// The affected document, already shaped for the client.
    pub document: serde_json::Value,
    /// Owner of the document; also the fan-out key for delivery.
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl ChangeEvent {
    /// Create a change event for one document.
    pub fn new(
        kind: EventKind,
        collection: impl Into<String>,
        document: serde_json::Value,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            collection: collection.into(),
            document,
            user_id: user_id.into(),
        }
    }
}
