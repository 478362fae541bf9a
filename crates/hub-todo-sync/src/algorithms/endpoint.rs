//! # Endpoint Normalization
//!
//! Turns a Hub service location into the URL requests are sent to.

use crate::domain::API_PATH_MARKER;

/// Append the versioned API path to a bare Hub endpoint.
///
/// # Rules
/// 1. An endpoint already containing `api` is returned unchanged
/// 2. Otherwise `api_suffix` is appended, with a `/` separator only if the
///    endpoint does not already end with one
pub fn normalize_hub_endpoint(endpoint: &str, api_suffix: &str) -> String {
    if endpoint.contains(API_PATH_MARKER) {
        return endpoint.to_string();
    }

    let separator = if endpoint.ends_with('/') { "" } else { "/" };
    format!("{endpoint}{separator}{api_suffix}")
}
