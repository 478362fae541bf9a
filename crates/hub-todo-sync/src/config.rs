//! # Hub Sync Configuration
//!
//! Connection options entered by the user, the client signing key, and the
//! fixed collection settings the sync layer works against.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    CommitScope, HubError, DEFAULT_API_SUFFIX, IDENTITY_HUB_SERVICE,
};

/// Options for connecting to a Hub.
///
/// Blank `hub_did` / `hub_endpoint` request auto-discovery through the
/// client's DID document. Options are never mutated once a session exists.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HubConnectionOptions {
    /// DID of the Hub client (the user).
    pub client_did: String,
    /// Private key of the client as a JWK JSON string.
    pub client_private_jwk: String,
    /// DID of the Hub, or blank to discover.
    #[serde(default)]
    pub hub_did: String,
    /// Hub endpoint, or blank to discover.
    #[serde(default)]
    pub hub_endpoint: String,
    /// DID resolver endpoint.
    pub did_resolver: String,
}

impl HubConnectionOptions {
    /// Check that the required fields are filled in.
    pub fn validate(&self) -> Result<(), HubError> {
        for (name, value) in [
            ("clientDid", &self.client_did),
            ("clientPrivateJwk", &self.client_private_jwk),
            ("didResolver", &self.did_resolver),
        ] {
            if is_blank(value) {
                return Err(HubError::Configuration(format!("{name} is required")));
            }
        }
        Ok(())
    }

    /// Explicit Hub DID, if one was supplied.
    pub fn hub_did_override(&self) -> Option<&str> {
        non_blank(&self.hub_did)
    }

    /// Explicit Hub endpoint, if one was supplied.
    pub fn hub_endpoint_override(&self) -> Option<&str> {
        non_blank(&self.hub_endpoint)
    }

    /// Parse the client key from `client_private_jwk`.
    pub fn client_key(&self) -> Result<ClientKey, HubError> {
        ClientKey::from_jwk(&self.client_did, &self.client_private_jwk)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Client private key with a DID-qualified key id.
#[derive(Clone, PartialEq)]
pub struct ClientKey {
    kid: String,
    jwk: Value,
}

impl ClientKey {
    /// Parse a JWK and qualify its `kid` with the client DID.
    ///
    /// A `kid` without `#` becomes `<client_did>#<kid>`.
    pub fn from_jwk(client_did: &str, jwk_json: &str) -> Result<Self, HubError> {
        let mut jwk: Value = serde_json::from_str(jwk_json)
            .map_err(|e| HubError::InvalidKey(format!("JWK is not valid JSON: {e}")))?;

        let kid = jwk
            .get("kid")
            .and_then(Value::as_str)
            .filter(|kid| !kid.is_empty())
            .ok_or_else(|| HubError::InvalidKey("JWK must include a kid field".to_string()))?;

        let kid = if kid.contains('#') {
            kid.to_string()
        } else {
            format!("{client_did}#{kid}")
        };

        if let Some(object) = jwk.as_object_mut() {
            object.insert("kid".to_string(), Value::String(kid.clone()));
        }

        Ok(Self { kid, jwk })
    }

    /// Fully qualified key id.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// JWK key type (`kty`), if present.
    pub fn key_type(&self) -> Option<&str> {
        self.jwk.get("kty").and_then(Value::as_str)
    }

    /// A string member of the JWK.
    pub fn member(&self, name: &str) -> Option<&str> {
        self.jwk.get(name).and_then(Value::as_str)
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKey")
            .field("kid", &self.kid)
            .field("kty", &self.key_type())
            .finish_non_exhaustive()
    }
}

/// Fixed settings of the to-do collection and the sync loop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HubSyncConfig {
    /// Interface, context, type and strategy of to-do commits.
    pub scope: CommitScope,
    /// DID document service type advertising a Hub.
    pub hub_service_type: String,
    /// Versioned API path appended to bare Hub endpoints.
    pub api_suffix: String,
    /// Maximum pages per paginated query; `None` follows the server to
    /// the end.
    pub max_pages: Option<usize>,
}

impl Default for HubSyncConfig {
    fn default() -> Self {
        Self {
            scope: CommitScope::default(),
            hub_service_type: IDENTITY_HUB_SERVICE.to_string(),
            api_suffix: DEFAULT_API_SUFFIX.to_string(),
            max_pages: None,
        }
    }
}

impl HubSyncConfig {
    /// Create a config for testing (bounded paging).
    pub fn for_testing() -> Self {
        Self {
            max_pages: Some(16),
            ..Self::default()
        }
    }
}
