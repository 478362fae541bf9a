//! Shared fixtures for application-layer tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::session::HubSession;
use crate::adapters::{Hs256CommitSigner, InMemoryHub, StaticResolver};
use crate::config::ClientKey;
use crate::domain::{Commit, CommitHeaders, CommitScope, Operation};
use crate::ports::{CommitSigner, SessionContext};

pub(crate) const ALICE: &str = "did:example:alice";
pub(crate) const HUB_DID: &str = "did:example:hub";
pub(crate) const HUB_ENDPOINT: &str = "https://hub.example.com/api/v1.0";

pub(crate) fn client_key() -> ClientKey {
    ClientKey::from_jwk(ALICE, r#"{"kty":"oct","kid":"key-1","k":"c2VjcmV0"}"#).unwrap()
}

pub(crate) fn hub() -> Arc<InMemoryHub> {
    Arc::new(InMemoryHub::new(HUB_DID, HUB_ENDPOINT))
}

/// A session bound to `hub` without going through discovery.
pub(crate) fn session(hub: &Arc<InMemoryHub>) -> Arc<HubSession> {
    Arc::new(HubSession::new(
        SessionContext {
            hub_endpoint: HUB_ENDPOINT.to_string(),
            hub_did: HUB_DID.to_string(),
            client_did: ALICE.to_string(),
            client_key: client_key(),
            target_did: ALICE.to_string(),
        },
        Arc::new(StaticResolver::new()),
        hub.clone(),
    ))
}

pub(crate) fn signer() -> Arc<Hs256CommitSigner> {
    Arc::new(Hs256CommitSigner::from_client_key(&client_key()).unwrap())
}

/// Sign and append a commit directly; returns its revision.
pub(crate) async fn seed_at(
    hub: &InMemoryHub,
    operation: Operation,
    object_id: Option<&str>,
    payload: Value,
    at: DateTime<Utc>,
) -> String {
    let headers = CommitHeaders::new(ALICE, &CommitScope::default(), operation, object_id, at);
    let signed = signer().sign(&Commit::new(headers, payload)).await.unwrap();
    hub.append(signed).unwrap().revisions.remove(0)
}

pub(crate) async fn seed(
    hub: &InMemoryHub,
    operation: Operation,
    object_id: Option<&str>,
    payload: Value,
) -> String {
    seed_at(hub, operation, object_id, payload, Utc::now()).await
}
