//! # Bootstrap Integration Tests
//!
//! Connection setup from login options to a probed session.
//!
//! ## Scenarios
//!
//! 1. **Discovery**: client DID → Hub DID → Hub endpoint, normalized
//! 2. **Overrides**: explicit Hub DID and endpoint skip Hub resolution
//! 3. **Failures**: each discovery step reports its own error kind

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hub_todo_sync::domain::ServiceEntry;
    use hub_todo_sync::{
        DidDocument, HubConnectionOptions, HubError, HubRequest, InMemoryHub, StaticResolver,
    };

    use crate::integration::{World, ALICE, HUB_DID, HUB_ENDPOINT};

    // =============================================================================
    // DISCOVERY
    // =============================================================================

    /// Full discovery chain ends at the normalized endpoint and is probed once.
    #[tokio::test]
    async fn test_discovery_chain() {
        let world = World::new();

        let session = world.connect().await.unwrap();

        assert_eq!(session.hub_did(), HUB_DID);
        assert_eq!(session.hub_endpoint(), HUB_ENDPOINT);
        assert_eq!(session.client_did(), ALICE);
        assert_eq!(world.resolver.resolution_count(ALICE), 1);
        assert_eq!(world.resolver.resolution_count(HUB_DID), 1);

        let requests = world.hub.requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(requests[0], HubRequest::ObjectQuery(_)));
    }

    /// A location that already names the API path is used as-is.
    #[tokio::test]
    async fn test_discovered_endpoint_with_api_path_is_kept() {
        let endpoint = "https://hub.example.com/api/v2";
        let world = World::with_hub(InMemoryHub::new(HUB_DID, endpoint));
        world.resolver.insert(DidDocument::new(
            HUB_DID,
            vec![ServiceEntry::with_locations("IdentityHub", vec![endpoint.to_string()])],
        ));

        let session = world.connect().await.unwrap();
        assert_eq!(session.hub_endpoint(), endpoint);
    }

    /// A trailing slash on the advertised location does not double up.
    #[tokio::test]
    async fn test_discovered_endpoint_trailing_slash() {
        let world = World::new();
        world.resolver.insert(DidDocument::new(
            HUB_DID,
            vec![ServiceEntry::with_locations(
                "IdentityHub",
                vec!["https://hub.example.com/".to_string()],
            )],
        ));

        let session = world.connect().await.unwrap();
        assert_eq!(session.hub_endpoint(), HUB_ENDPOINT);
    }

    // =============================================================================
    // OVERRIDES
    // =============================================================================

    /// Explicit Hub DID and endpoint: only the client DID is resolved.
    #[tokio::test]
    async fn test_overrides_skip_hub_resolution() {
        let world = World::with_hub(InMemoryHub::new("did:example:own-hub", "http://localhost:8080"));
        let options = HubConnectionOptions {
            hub_did: "did:example:own-hub".to_string(),
            hub_endpoint: "http://localhost:8080".to_string(),
            ..world.options()
        };

        let session = world.connector().connect(&options).await.unwrap();

        assert_eq!(session.hub_endpoint(), "http://localhost:8080");
        assert_eq!(world.resolver.total_resolutions(), 1);
        assert_eq!(world.resolver.resolution_count("did:example:own-hub"), 0);
    }

    /// Options arrive from the shell as camelCase JSON.
    #[tokio::test]
    async fn test_options_from_json() {
        let world = World::new();
        let options: HubConnectionOptions = serde_json::from_value(serde_json::json!({
            "clientDid": ALICE,
            "clientPrivateJwk": crate::integration::CLIENT_JWK,
            "hubDid": "",
            "hubEndpoint": "   ",
            "didResolver": "https://resolver.example.com"
        }))
        .unwrap();

        let session = world.connector().connect(&options).await.unwrap();
        assert_eq!(session.hub_endpoint(), HUB_ENDPOINT);
    }

    // =============================================================================
    // FAILURES
    // =============================================================================

    /// Unknown client DID fails before the Hub is contacted.
    #[tokio::test]
    async fn test_unknown_client_did() {
        let world = World::new();
        let options = HubConnectionOptions {
            client_did: "did:example:mallory".to_string(),
            ..world.options()
        };

        let result = world.connector().connect(&options).await;
        assert!(matches!(result, Err(HubError::Resolution { ref did, .. }) if did == "did:example:mallory"));
        assert!(world.hub.requests().is_empty());
    }

    /// A resolver outage is a resolution error and is retryable.
    #[tokio::test]
    async fn test_resolver_outage() {
        let world = World::new();
        world.resolver.set_unreachable(true);

        let err = world.connect().await.unwrap_err();
        assert!(matches!(err, HubError::Resolution { .. }));
        assert!(err.is_retryable());
    }

    /// No IdentityHub service in the client's document.
    #[tokio::test]
    async fn test_missing_hub_service() {
        let world = World::new();
        world.resolver.insert(DidDocument::new(ALICE, vec![]));

        let err = world.connect().await.unwrap_err();
        assert!(matches!(err, HubError::Configuration(_)));
        assert!(!err.is_retryable());
    }

    /// Hub unreachable at probe time.
    #[tokio::test]
    async fn test_probe_failure() {
        let world = World::new();
        world.hub.set_offline(true);

        let result = world.connect().await;
        assert!(matches!(result, Err(HubError::Connectivity(_))));
    }

    /// A Hub at a different endpoint than the one discovered rejects the probe.
    #[tokio::test]
    async fn test_probe_reaches_wrong_hub() {
        let world = World::with_hub(InMemoryHub::new(HUB_DID, "https://elsewhere.example.com/api/v1.0"));

        let result = world.connect().await;
        assert!(matches!(result, Err(HubError::Connectivity(_))));
    }

    /// Missing required options are reported before any resolution.
    #[tokio::test]
    async fn test_incomplete_options() {
        let world = World::new();
        let options = HubConnectionOptions {
            did_resolver: String::new(),
            ..world.options()
        };

        let result = world.connector().connect(&options).await;
        assert!(matches!(result, Err(HubError::Configuration(msg)) if msg.contains("didResolver")));
        assert_eq!(world.resolver.total_resolutions(), 0);
    }
}
