//! # Domain Invariants
//!
//! Constants and rules that must always hold for the to-do collection.

use std::collections::HashSet;

use super::entities::TodoItem;

/// Hub interface the to-do collection lives under.
pub const COLLECTIONS_INTERFACE: &str = "Collections";

/// Schema context for to-do objects.
pub const SCHEMA_CONTEXT: &str = "identity.foundation/schemas";

/// Object type name for to-do objects.
pub const TODO_OBJECT_TYPE: &str = "ToDoItem";

/// DID document service type that advertises a Hub.
pub const IDENTITY_HUB_SERVICE: &str = "IdentityHub";

/// Versioned API path appended to bare Hub endpoints.
pub const DEFAULT_API_SUFFIX: &str = "api/v1.0";

/// Substring that marks an endpoint as already pointing at the API.
pub const API_PATH_MARKER: &str = "api";

/// Identifier of the last-writer-wins commit strategy.
pub const BASIC_COMMIT_STRATEGY: &str = "basic";

/// Invariant: every assigned object id appears at most once in a list.
///
/// Items still waiting for their create acknowledgement have an empty id
/// and are exempt.
pub fn invariant_unique_object_ids(items: &[TodoItem]) -> bool {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !item.object_id.is_empty())
        .all(|item| seen.insert(item.object_id.as_str()))
}

/// Invariant: an item without an object id must be marked as updating,
/// unless its create has failed.
pub fn invariant_unassigned_is_pending(item: &TodoItem) -> bool {
    !item.object_id.is_empty() || item.updating || item.state.is_failed()
}
