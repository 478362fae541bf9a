//! # Domain Entities
//!
//! To-do items, commits and their signed wire envelopes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::errors::HubError;
use super::value_objects::{CommitScope, ItemOperation, ItemState, LocalId, Operation};

/// Reconciled, UI-facing to-do item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    /// Model-local handle.
    #[serde(skip)]
    pub local_id: LocalId,
    /// Hub object id; empty until the create commit is acknowledged.
    pub object_id: String,
    /// To-do text.
    pub text: String,
    /// Completion flag.
    pub done: bool,
    /// A commit for this item is in flight.
    #[serde(skip)]
    pub updating: bool,
    /// Write-path state.
    #[serde(skip)]
    pub state: ItemState,
}

impl TodoItem {
    /// An item created locally, waiting for the Hub to assign its id.
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            local_id: LocalId::default(),
            object_id: String::new(),
            text: text.into(),
            done: false,
            updating: true,
            state: ItemState::Pending(ItemOperation::Create),
        }
    }

    /// An item in sync with the Hub.
    pub fn settled(object_id: impl Into<String>, text: impl Into<String>, done: bool) -> Self {
        Self {
            local_id: LocalId::default(),
            object_id: object_id.into(),
            text: text.into(),
            done,
            updating: false,
            state: ItemState::Settled,
        }
    }

    /// Assign the model-local handle.
    pub fn with_local_id(mut self, local_id: LocalId) -> Self {
        self.local_id = local_id;
        self
    }

    /// Move to a new write-path state, keeping `updating` in step.
    pub fn set_state(&mut self, state: ItemState) {
        self.updating = state.is_pending();
        self.state = state;
    }
}

/// Object metadata returned by an object query.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Object id (revision of the object's create commit).
    pub id: String,
    /// Hub interface.
    pub interface: String,
    /// Schema context.
    pub context: String,
    /// Object type name.
    #[serde(rename = "type")]
    pub object_type: String,
    /// DID that created the object.
    #[serde(default)]
    pub created_by: String,
}

/// Protected headers of a commit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitHeaders {
    /// Commit time, serialized as RFC 3339.
    pub committed_at: DateTime<Utc>,
    /// Issuer DID.
    pub iss: String,
    /// Subject DID (owner of the collection).
    pub sub: String,
    /// Hub interface.
    pub interface: String,
    /// Schema context.
    pub context: String,
    /// Object type name.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Operation this commit performs.
    pub operation: Operation,
    /// Commit strategy tag.
    pub commit_strategy: String,
    /// Target object; absent on the creating commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

impl CommitHeaders {
    /// Build the standard headers for a commit the client writes to its own
    /// collection (issuer and subject are both the client DID).
    pub fn new(
        client_did: &str,
        scope: &CommitScope,
        operation: Operation,
        object_id: Option<&str>,
        committed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            committed_at,
            iss: client_did.to_string(),
            sub: client_did.to_string(),
            interface: scope.interface.clone(),
            context: scope.context.clone(),
            object_type: scope.object_type.clone(),
            operation,
            commit_strategy: scope.commit_strategy.clone(),
            object_id: object_id.map(str::to_string),
        }
    }
}

/// An unsigned commit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    /// Protected headers.
    pub headers: CommitHeaders,
    /// Payload mapping; an empty object for deletes.
    pub payload: Value,
}

impl Commit {
    /// Create a commit.
    pub fn new(headers: CommitHeaders, payload: Value) -> Self {
        Self { headers, payload }
    }

    /// Operation of this commit.
    pub fn operation(&self) -> Operation {
        self.headers.operation
    }
}

/// JWS protected header: commit headers plus signature parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectedHeader {
    /// Commit headers.
    #[serde(flatten)]
    pub headers: CommitHeaders,
    /// Signature algorithm.
    pub alg: String,
    /// Signing key id.
    pub kid: String,
}

/// A signed commit in flattened JWS form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedCommit {
    /// Base64url JSON of the [`ProtectedHeader`].
    pub protected: String,
    /// Base64url JSON of the payload.
    pub payload: String,
    /// Base64url detached signature over [`SignedCommit::signing_input`].
    pub signature: String,
}

impl SignedCommit {
    /// Bytes the signature covers: `protected "." payload`.
    pub fn signing_input(&self) -> String {
        signing_input(&self.protected, &self.payload)
    }

    /// Content address of this commit: hex SHA-256 of the signing input.
    pub fn revision(&self) -> String {
        hex::encode(Sha256::digest(self.signing_input().as_bytes()))
    }

    /// Decode the protected header.
    pub fn protected_header(&self) -> Result<ProtectedHeader, HubError> {
        decode_segment(&self.protected)
    }

    /// Decode into an unsigned commit. The signature is not checked.
    pub fn decode(&self) -> Result<Commit, HubError> {
        let header = self.protected_header()?;
        let payload: Value = decode_segment(&self.payload)?;
        Ok(Commit::new(header.headers, payload))
    }

    /// Decode and resolve the object this commit belongs to.
    ///
    /// A create commit carries no `object_id`; the Hub names the new object
    /// after the create commit's revision.
    pub fn open(&self) -> Result<DecodedCommit, HubError> {
        let commit = self.decode()?;
        let revision = self.revision();
        let object_id = match (&commit.headers.object_id, commit.operation()) {
            (Some(id), _) => id.clone(),
            (None, Operation::Create) => revision.clone(),
            (None, op) => {
                return Err(HubError::MalformedCommit(format!(
                    "{} commit {} has no object_id",
                    op.as_str(),
                    revision
                )))
            }
        };
        Ok(DecodedCommit {
            object_id,
            revision,
            commit,
        })
    }

    /// Object id this commit addresses.
    pub fn object_id(&self) -> Result<String, HubError> {
        self.open().map(|decoded| decoded.object_id)
    }
}

/// A signed commit opened for reconciliation.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedCommit {
    /// Object the commit belongs to.
    pub object_id: String,
    /// Revision of the signed envelope.
    pub revision: String,
    /// Decoded headers and payload.
    pub commit: Commit,
}

/// `protected "." payload`, the JWS signing input.
pub(crate) fn signing_input(protected: &str, payload: &str) -> String {
    format!("{protected}.{payload}")
}

/// Serialize a value as a base64url JSON segment.
pub(crate) fn encode_segment<T: Serialize>(value: &T) -> Result<String, HubError> {
    let json = serde_json::to_vec(value).map_err(|e| HubError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Parse a base64url JSON segment.
pub(crate) fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, HubError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| HubError::MalformedCommit(format!("bad base64url segment: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| HubError::MalformedCommit(format!("bad JSON segment: {e}")))
}
