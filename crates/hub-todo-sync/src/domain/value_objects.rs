//! # Domain Value Objects
//!
//! Immutable value types for Identity Hub sync.

use serde::{Deserialize, Serialize};

use super::invariants::{
    BASIC_COMMIT_STRATEGY, COLLECTIONS_INTERFACE, SCHEMA_CONTEXT, TODO_OBJECT_TYPE,
};

/// Commit operation taxonomy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// First commit of an object; the Hub assigns the object id.
    Create,
    /// Replaces the object's state.
    Update,
    /// Tombstones the object.
    Delete,
}

impl Operation {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Where in a Hub a family of objects lives, and how its commits fold.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitScope {
    /// Hub interface (e.g. `Collections`).
    pub interface: String,
    /// Schema context.
    pub context: String,
    /// Object type name.
    pub object_type: String,
    /// Commit strategy tag written into every commit.
    pub commit_strategy: String,
}

impl Default for CommitScope {
    fn default() -> Self {
        Self {
            interface: COLLECTIONS_INTERFACE.to_string(),
            context: SCHEMA_CONTEXT.to_string(),
            object_type: TODO_OBJECT_TYPE.to_string(),
            commit_strategy: BASIC_COMMIT_STRATEGY.to_string(),
        }
    }
}

/// Payload of a to-do create/update commit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPayload {
    /// To-do text.
    pub text: String,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
}

/// Service endpoint of a DID document service entry.
///
/// Hub entries in a user's document list Hub DIDs in `instances`; the Hub's
/// own document lists URLs in `locations`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// DIDs of service instances.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<String>,
    /// URLs the service is reachable at.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

/// A single `service` entry of a DID document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    /// Service id (usually `<did>#<fragment>`).
    #[serde(default)]
    pub id: String,
    /// Service type, e.g. `IdentityHub`.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoint description.
    #[serde(default)]
    pub service_endpoint: ServiceEndpoint,
}

impl ServiceEntry {
    /// Create an entry listing Hub DIDs.
    pub fn with_instances(service_type: &str, instances: Vec<String>) -> Self {
        Self {
            id: String::new(),
            service_type: service_type.to_string(),
            service_endpoint: ServiceEndpoint {
                instances,
                locations: Vec::new(),
            },
        }
    }

    /// Create an entry listing URLs.
    pub fn with_locations(service_type: &str, locations: Vec<String>) -> Self {
        Self {
            id: String::new(),
            service_type: service_type.to_string(),
            service_endpoint: ServiceEndpoint {
                instances: Vec::new(),
                locations,
            },
        }
    }
}

/// The subset of a DID document the bootstrapper reads.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DidDocument {
    /// The DID this document describes.
    pub id: String,
    /// Service entries.
    #[serde(default)]
    pub service: Vec<ServiceEntry>,
}

impl DidDocument {
    /// Create a document with the given services.
    pub fn new(id: impl Into<String>, service: Vec<ServiceEntry>) -> Self {
        Self {
            id: id.into(),
            service,
        }
    }

    /// All service entries of the given type, in document order.
    pub fn services_by_type<'a>(
        &'a self,
        service_type: &'a str,
    ) -> impl Iterator<Item = &'a ServiceEntry> + 'a {
        self.service
            .iter()
            .filter(move |s| s.service_type == service_type)
    }
}

/// What a to-do item is waiting on, or what last failed for it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemOperation {
    /// Creating the item.
    Create,
    /// Toggling or editing the item.
    Update,
    /// Deleting the item.
    Delete,
}

/// Write-path state of a to-do item in the model.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemState {
    /// In sync with the last acknowledged commit.
    #[default]
    Settled,
    /// A commit is in flight.
    Pending(ItemOperation),
    /// The last commit failed; the optimistic change was reverted.
    Failed {
        /// Operation that failed.
        operation: ItemOperation,
        /// Error message from the store.
        reason: String,
    },
}

impl ItemState {
    /// Is a commit in flight?
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Did the last commit fail?
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Model-local handle for a to-do item, stable before and after the Hub
/// assigns an object id.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u64);

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local-{}", self.0)
    }
}
