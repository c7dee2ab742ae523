//! Sync broadcast payloads
//!
//! Every successful mutation publishes a [`SyncPayload`] on the in-process
//! sync channel. Notification and printer consumers subscribe to it; the SPA
//! polls versions to decide when to refresh a resource list.

use serde::{Deserialize, Serialize};

/// Resource change notification.
///
/// `version` increases monotonically per resource; a consumer that observes
/// a gap can fall back to a full refetch of that resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type (e.g. "dining_table", "order_item", "register")
    pub resource: String,
    /// Per-resource monotonic version
    pub version: u64,
    /// Change type ("created", "updated", "deleted", "closed", ...)
    pub action: String,
    /// Entity ID
    pub id: String,
    /// Entity data (None for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SyncPayload {
    pub fn new<T: Serialize>(
        resource: &str,
        version: u64,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) -> Self {
        Self {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        }
    }
}
