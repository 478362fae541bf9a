//! # Connection Bootstrapper
//!
//! Resolves the client DID, discovers the Hub (unless overridden), opens a
//! session and probes it.
//!
//! ## Discovery chain
//!
//! ```text
//! client DID ──resolve──▶ client document
//!   └─ IdentityHub service ─ instances[0] ──▶ Hub DID
//!        └──resolve──▶ Hub document
//!             └─ IdentityHub service ─ locations[0] ──normalize──▶ endpoint
//! ```
//!
//! Explicit `hub_did` / `hub_endpoint` options replace the matching links,
//! field by field.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::session::HubSession;
use crate::algorithms::normalize_hub_endpoint;
use crate::config::{HubConnectionOptions, HubSyncConfig};
use crate::domain::{DidDocument, HubError, HubRequest, ObjectQuery};
use crate::ports::{DidResolver, HubTransport, SessionContext};

/// Opens Hub sessions.
pub struct HubConnector {
    resolver: Arc<dyn DidResolver>,
    transport: Arc<dyn HubTransport>,
    config: HubSyncConfig,
}

impl HubConnector {
    /// Create a connector.
    pub fn new(
        resolver: Arc<dyn DidResolver>,
        transport: Arc<dyn HubTransport>,
        config: HubSyncConfig,
    ) -> Self {
        Self {
            resolver,
            transport,
            config,
        }
    }

    /// Connect to the client's Hub.
    ///
    /// Nothing is cached between calls: a failed attempt can be retried
    /// from scratch with the same options.
    ///
    /// # Errors
    /// - `Configuration` / `InvalidKey` for incomplete options or a bad key
    /// - `Resolution` if the client or Hub DID cannot be resolved
    /// - `Configuration` if discovery needs a service entry that is missing
    /// - `Connectivity` if the probe request fails
    pub async fn connect(&self, options: &HubConnectionOptions) -> Result<HubSession, HubError> {
        options.validate()?;
        let client_key = options.client_key()?;
        let client_did = options.client_did.trim();

        info!("[hub-sync] Resolving DID document for {}", client_did);
        let client_document = self.resolve_document(client_did).await?;
        debug!(
            "[hub-sync] Found DID document for {} with {} services",
            client_did,
            client_document.service.len()
        );

        let (hub_did, hub_endpoint) = match (
            options.hub_did_override(),
            options.hub_endpoint_override(),
        ) {
            (Some(hub_did), Some(endpoint)) => {
                info!("[hub-sync] Using user-specified Hub {} at {}", hub_did, endpoint);
                (hub_did.to_string(), endpoint.to_string())
            }
            (Some(hub_did), None) => {
                let endpoint = self.discover_endpoint(hub_did).await?;
                (hub_did.to_string(), endpoint)
            }
            (None, Some(endpoint)) => {
                info!("[hub-sync] Using user-specified Hub endpoint {}", endpoint);
                (self.discover_hub_did(&client_document, true)?, endpoint.to_string())
            }
            (None, None) => {
                let hub_did = self.discover_hub_did(&client_document, false)?;
                let endpoint = self.discover_endpoint(&hub_did).await?;
                (hub_did, endpoint)
            }
        };

        let session = HubSession::new(
            SessionContext {
                hub_endpoint,
                hub_did,
                client_did: client_did.to_string(),
                client_key,
                target_did: client_did.to_string(),
            },
            Arc::clone(&self.resolver),
            Arc::clone(&self.transport),
        );

        self.probe(&session).await?;
        info!(
            "[hub-sync] Connected to Hub {} at {}",
            session.hub_did(),
            session.hub_endpoint()
        );

        Ok(session)
    }

    /// Resolve a DID, treating "no document" as a resolution failure.
    async fn resolve_document(&self, did: &str) -> Result<DidDocument, HubError> {
        match self.resolver.resolve(did).await {
            Ok(Some(document)) => Ok(document),
            Ok(None) => Err(HubError::resolution(did, "no DID document found")),
            Err(err @ HubError::Resolution { .. }) => Err(err),
            Err(other) => Err(HubError::resolution(did, other.to_string())),
        }
    }

    /// First Hub DID listed by the client's IdentityHub service.
    ///
    /// `endpoint_given` picks the option the caller is told to supply when
    /// the service is missing: the Hub DID if an endpoint was already given.
    fn discover_hub_did(
        &self,
        client_document: &DidDocument,
        endpoint_given: bool,
    ) -> Result<String, HubError> {
        let service = client_document
            .services_by_type(&self.config.hub_service_type)
            .next()
            .ok_or_else(|| {
                let missing = if endpoint_given { "the Hub DID" } else { "a Hub endpoint" };
                HubError::Configuration(format!(
                    "DID document for {} doesn't list an {} service - please specify {}",
                    client_document.id, self.config.hub_service_type, missing
                ))
            })?;

        let hub_did = service
            .service_endpoint
            .instances
            .first()
            .ok_or_else(|| {
                HubError::Configuration(format!(
                    "The {} entry in the DID document for {} doesn't list a Hub DID",
                    self.config.hub_service_type, client_document.id
                ))
            })?;

        info!("[hub-sync] Found {} DID: {}", self.config.hub_service_type, hub_did);
        Ok(hub_did.clone())
    }

    /// Resolve the Hub's own document and derive its API endpoint.
    async fn discover_endpoint(&self, hub_did: &str) -> Result<String, HubError> {
        let hub_document = self.resolve_document(hub_did).await?;
        debug!("[hub-sync] Got DID document for Hub {}", hub_did);

        let location = hub_document
            .services_by_type(&self.config.hub_service_type)
            .next()
            .and_then(|service| service.service_endpoint.locations.first())
            .ok_or_else(|| {
                HubError::Configuration(format!(
                    "DID document for Hub {hub_did} does not list an endpoint"
                ))
            })?;

        let endpoint = normalize_hub_endpoint(location, &self.config.api_suffix);
        info!("[hub-sync] Found Hub service endpoint: {}", endpoint);
        Ok(endpoint)
    }

    /// Send a harmless read to confirm the session works end to end.
    async fn probe(&self, session: &HubSession) -> Result<(), HubError> {
        let request = HubRequest::ObjectQuery(ObjectQuery::for_scope(&self.config.scope));
        session
            .send(request)
            .await
            .and_then(|response| response.into_objects())
            .map_err(|e| {
                warn!("[hub-sync] Hub probe failed: {}", e);
                HubError::Connectivity(e.to_string())
            })?;

        debug!("[hub-sync] Successfully sent test read request to Hub");
        Ok(())
    }
}
