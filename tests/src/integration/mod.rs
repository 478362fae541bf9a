//! # Integration Tests
//!
//! Cross-module flows over the in-memory Hub and static resolver.

pub mod bootstrap;
pub mod flows;

use std::sync::Arc;

use hub_todo_sync::{
    DidDocument, Hs256CommitSigner, HubConnectionOptions, HubConnector, HubError, HubSession,
    HubStore, HubSyncConfig, InMemoryHub, StaticResolver,
};
use hub_todo_sync::domain::ServiceEntry;

/// The user.
pub const ALICE: &str = "did:example:alice";
/// The user's Hub.
pub const HUB_DID: &str = "did:other:hub";
/// Location advertised in the Hub's DID document.
pub const HUB_LOCATION: &str = "https://hub.example.com";
/// Endpoint after normalization.
pub const HUB_ENDPOINT: &str = "https://hub.example.com/api/v1.0";
/// Symmetric client key shared by every test device.
pub const CLIENT_JWK: &str = r#"{"kty":"oct","kid":"key-1","k":"c2VjcmV0LWtleS1tYXRlcmlhbA"}"#;

/// A resolver, a Hub and the documents that link them.
pub struct World {
    /// DID resolver.
    pub resolver: Arc<StaticResolver>,
    /// The Hub.
    pub hub: Arc<InMemoryHub>,
}

impl World {
    /// Alice's document points at the Hub; the Hub's document lists a bare
    /// location.
    pub fn new() -> Self {
        Self::with_hub(InMemoryHub::new(HUB_DID, HUB_ENDPOINT))
    }

    /// Same documents, custom Hub (e.g. a smaller page size).
    pub fn with_hub(hub: InMemoryHub) -> Self {
        let resolver = StaticResolver::new()
            .with_document(DidDocument::new(
                ALICE,
                vec![ServiceEntry::with_instances("IdentityHub", vec![HUB_DID.to_string()])],
            ))
            .with_document(DidDocument::new(
                HUB_DID,
                vec![ServiceEntry::with_locations("IdentityHub", vec![HUB_LOCATION.to_string()])],
            ));

        Self {
            resolver: Arc::new(resolver),
            hub: Arc::new(hub),
        }
    }

    /// Login options with discovery enabled.
    pub fn options(&self) -> HubConnectionOptions {
        HubConnectionOptions {
            client_did: ALICE.to_string(),
            client_private_jwk: CLIENT_JWK.to_string(),
            hub_did: String::new(),
            hub_endpoint: String::new(),
            did_resolver: "https://resolver.example.com".to_string(),
        }
    }

    /// Connector over this world.
    pub fn connector(&self) -> HubConnector {
        HubConnector::new(
            self.resolver.clone(),
            self.hub.clone(),
            HubSyncConfig::for_testing(),
        )
    }

    /// Bootstrap a session with discovery.
    pub async fn connect(&self) -> Result<Arc<HubSession>, HubError> {
        self.connector().connect(&self.options()).await.map(Arc::new)
    }

    /// Bootstrap a session and wrap it in a store, as a device would.
    pub async fn device(&self) -> Result<Arc<HubStore>, HubError> {
        let options = self.options();
        let session = Arc::new(self.connector().connect(&options).await?);
        let signer = Hs256CommitSigner::from_client_key(&options.client_key()?)?;
        Ok(Arc::new(HubStore::new(
            session,
            Arc::new(signer),
            HubSyncConfig::for_testing(),
        )))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
