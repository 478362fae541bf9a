//! # Hub Session
//!
//! An established, authenticated binding between a client and its Hub.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{HubError, HubRequest, HubResponse};
use crate::ports::{DidResolver, HubTransport, SessionContext};

/// Session with a Hub.
///
/// Read-only after construction: the Hub DID and endpoint are fixed for
/// the session's lifetime. Shared between the reconciler and the store.
pub struct HubSession {
    context: SessionContext,
    resolver: Arc<dyn DidResolver>,
    transport: Arc<dyn HubTransport>,
}

impl HubSession {
    /// Bind a session.
    pub fn new(
        context: SessionContext,
        resolver: Arc<dyn DidResolver>,
        transport: Arc<dyn HubTransport>,
    ) -> Self {
        Self {
            context,
            resolver,
            transport,
        }
    }

    /// Everything the session is bound to.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Hub API endpoint.
    pub fn hub_endpoint(&self) -> &str {
        &self.context.hub_endpoint
    }

    /// DID of the Hub.
    pub fn hub_did(&self) -> &str {
        &self.context.hub_did
    }

    /// DID of the client.
    pub fn client_did(&self) -> &str {
        &self.context.client_did
    }

    /// DID whose collection this session reads and writes.
    pub fn target_did(&self) -> &str {
        &self.context.target_did
    }

    /// Resolver the session was bootstrapped with, for Hub key lookups.
    pub fn resolver(&self) -> &Arc<dyn DidResolver> {
        &self.resolver
    }

    /// Send a request to the Hub.
    pub async fn send(&self, request: HubRequest) -> Result<HubResponse, HubError> {
        debug!(
            "[hub-sync] Sending {} request to {}",
            request.kind(),
            self.context.hub_endpoint
        );
        self.transport.send(&self.context, request).await
    }
}

impl std::fmt::Debug for HubSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSession")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
