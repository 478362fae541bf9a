//! Static DID Resolver Adapter
//!
//! Implements `DidResolver` from a fixed set of documents. Used for local
//! setups and tests; counts every resolution per DID.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::domain::{DidDocument, HubError};
use crate::ports::outbound::DidResolver;

/// In-process DID resolver backed by a document map.
#[derive(Default)]
pub struct StaticResolver {
    documents: RwLock<HashMap<String, DidDocument>>,
    resolutions: Mutex<HashMap<String, usize>>,
    unreachable: AtomicBool,
}

impl StaticResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style document registration.
    pub fn with_document(self, document: DidDocument) -> Self {
        self.insert(document);
        self
    }

    /// Register or replace a document.
    pub fn insert(&self, document: DidDocument) {
        self.documents.write().insert(document.id.clone(), document);
    }

    /// Simulate the resolver endpoint being down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
        if unreachable {
            warn!("[hub-sync] Static resolver marked unreachable");
        }
    }

    /// Number of resolution calls made for a DID.
    pub fn resolution_count(&self, did: &str) -> usize {
        self.resolutions.lock().get(did).copied().unwrap_or(0)
    }

    /// Number of resolution calls made for any DID.
    pub fn total_resolutions(&self) -> usize {
        self.resolutions.lock().values().sum()
    }
}

#[async_trait]
impl DidResolver for StaticResolver {
    async fn resolve(&self, did: &str) -> Result<Option<DidDocument>, HubError> {
        *self.resolutions.lock().entry(did.to_string()).or_insert(0) += 1;
        debug!("[hub-sync] Static resolver lookup for {}", did);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(HubError::resolution(did, "resolver unreachable"));
        }

        Ok(self.documents.read().get(did).cloned())
    }
}
