//! # Outbound Ports
//!
//! Traits for external collaborators: DID resolution, the Hub wire
//! transport and commit signing.

use async_trait::async_trait;

use crate::config::ClientKey;
use crate::domain::{Commit, DidDocument, HubError, HubRequest, HubResponse, SignedCommit};

/// DID resolver - outbound port.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID to its document.
    ///
    /// `Ok(None)` means the resolver answered but knows no document.
    async fn resolve(&self, did: &str) -> Result<Option<DidDocument>, HubError>;
}

/// Everything a session is bound to, handed to the transport with every
/// request so it can address and authenticate it.
#[derive(Clone, Debug)]
pub struct SessionContext {
    /// Hub API endpoint.
    pub hub_endpoint: String,
    /// DID of the Hub.
    pub hub_did: String,
    /// DID of the client.
    pub client_did: String,
    /// Client key used for request authentication.
    pub client_key: ClientKey,
    /// DID whose collection is read and written.
    pub target_did: String,
}

/// Hub wire transport - outbound port.
#[async_trait]
pub trait HubTransport: Send + Sync {
    /// Send one request and return the typed response.
    ///
    /// Failures are reported as [`HubError::Transport`].
    async fn send(
        &self,
        context: &SessionContext,
        request: HubRequest,
    ) -> Result<HubResponse, HubError>;
}

/// Commit signer - outbound port.
#[async_trait]
pub trait CommitSigner: Send + Sync {
    /// Sign a commit, producing its wire envelope.
    ///
    /// Failures are reported as [`HubError::Signing`].
    async fn sign(&self, commit: &Commit) -> Result<SignedCommit, HubError>;
}
