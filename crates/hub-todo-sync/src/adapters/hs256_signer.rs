//! HS256 Commit Signer Adapter
//!
//! Implements `CommitSigner` with HMAC-SHA-256 flattened JWS signatures,
//! keyed by a symmetric (`kty: "oct"`) JWK.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::config::ClientKey;
use crate::domain::entities::{encode_segment, signing_input};
use crate::domain::{Commit, HubError, ProtectedHeader, SignedCommit};
use crate::ports::outbound::CommitSigner;

type HmacSha256 = Hmac<Sha256>;

/// JWS algorithm name.
const ALG_HS256: &str = "HS256";

/// HMAC-SHA-256 commit signer.
pub struct Hs256CommitSigner {
    kid: String,
    secret: Vec<u8>,
}

impl Hs256CommitSigner {
    /// Create a signer from a key id and raw secret.
    pub fn new(kid: impl Into<String>, secret: Vec<u8>) -> Result<Self, HubError> {
        if secret.is_empty() {
            return Err(HubError::InvalidKey("HS256 secret is empty".to_string()));
        }
        Ok(Self {
            kid: kid.into(),
            secret,
        })
    }

    /// Create a signer from an `oct` JWK carrying its secret in `k`.
    pub fn from_client_key(key: &ClientKey) -> Result<Self, HubError> {
        if key.key_type() != Some("oct") {
            return Err(HubError::InvalidKey(format!(
                "HS256 needs an oct key, got {}",
                key.key_type().unwrap_or("none")
            )));
        }
        let encoded = key
            .member("k")
            .ok_or_else(|| HubError::InvalidKey("oct JWK has no k member".to_string()))?;
        let secret = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| HubError::InvalidKey(format!("k is not base64url: {e}")))?;
        Self::new(key.kid(), secret)
    }

    /// Key id written into the protected header.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    fn mac(&self) -> Result<HmacSha256, HubError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| HubError::Signing(e.to_string()))
    }

    /// Check a commit's signature against this key.
    pub fn verify(&self, signed: &SignedCommit) -> bool {
        let Ok(signature) = URL_SAFE_NO_PAD.decode(&signed.signature) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(signed.signing_input().as_bytes());
        mac.verify_slice(&signature).is_ok()
    }
}

#[async_trait]
impl CommitSigner for Hs256CommitSigner {
    async fn sign(&self, commit: &Commit) -> Result<SignedCommit, HubError> {
        let header = ProtectedHeader {
            headers: commit.headers.clone(),
            alg: ALG_HS256.to_string(),
            kid: self.kid.clone(),
        };
        let protected = encode_segment(&header)?;
        let payload = encode_segment(&commit.payload)?;

        let mut mac = self.mac()?;
        mac.update(signing_input(&protected, &payload).as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        debug!(
            "[hub-sync] Signed {} commit with {}",
            commit.operation().as_str(),
            self.kid
        );

        Ok(SignedCommit {
            protected,
            payload,
            signature,
        })
    }
}
