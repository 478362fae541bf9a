//! # Hub Messages
//!
//! Requests sent over a Hub session and the typed responses they produce.

use serde::{Deserialize, Serialize};

use super::entities::{ObjectMetadata, SignedCommit};
use super::errors::HubError;
use super::value_objects::CommitScope;

/// One page of a paginated query result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Continuation token; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page.
    pub fn new(items: Vec<T>, skip_token: Option<String>) -> Self {
        Self { items, skip_token }
    }

    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Does the server have more pages?
    pub fn has_skip_token(&self) -> bool {
        self.skip_token.is_some()
    }
}

/// Query for object metadata in one interface/context/type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectQuery {
    /// Hub interface.
    pub interface: String,
    /// Schema context.
    pub context: String,
    /// Object type name.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Continuation token from the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_token: Option<String>,
}

impl ObjectQuery {
    /// First-page query for the objects of a scope.
    pub fn for_scope(scope: &CommitScope) -> Self {
        Self {
            interface: scope.interface.clone(),
            context: scope.context.clone(),
            object_type: scope.object_type.clone(),
            skip_token: None,
        }
    }

    /// Same query, continuing from a token.
    pub fn with_skip_token(mut self, skip_token: Option<String>) -> Self {
        self.skip_token = skip_token;
        self
    }
}

/// Query for the commits of a set of objects.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitQuery {
    /// Objects whose commits to return.
    pub object_ids: Vec<String>,
    /// Continuation token from the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_token: Option<String>,
}

impl CommitQuery {
    /// First-page query for the given objects.
    pub fn for_objects(object_ids: Vec<String>) -> Self {
        Self {
            object_ids,
            skip_token: None,
        }
    }

    /// Same query, continuing from a token.
    pub fn with_skip_token(mut self, skip_token: Option<String>) -> Self {
        self.skip_token = skip_token;
        self
    }
}

/// A request sent over a Hub session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "@type")]
pub enum HubRequest {
    /// Object metadata query.
    #[serde(rename = "ObjectQueryRequest")]
    ObjectQuery(ObjectQuery),
    /// Commit query.
    #[serde(rename = "CommitQueryRequest")]
    CommitQuery(CommitQuery),
    /// Append a signed commit.
    #[serde(rename = "WriteRequest")]
    Write {
        /// The commit to append.
        commit: SignedCommit,
    },
}

impl HubRequest {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ObjectQuery(_) => "object-query",
            Self::CommitQuery(_) => "commit-query",
            Self::Write { .. } => "write",
        }
    }
}

/// Acknowledgement of a write.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteAck {
    /// Revisions the write produced; the first is the new commit's.
    pub revisions: Vec<String>,
}

/// A typed Hub response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "@type")]
pub enum HubResponse {
    /// Page of object metadata.
    #[serde(rename = "ObjectQueryResponse")]
    ObjectQuery(Page<ObjectMetadata>),
    /// Page of signed commits.
    #[serde(rename = "CommitQueryResponse")]
    CommitQuery(Page<SignedCommit>),
    /// Write acknowledgement.
    #[serde(rename = "WriteResponse")]
    Write(WriteAck),
}

impl HubResponse {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ObjectQuery(_) => "object-query",
            Self::CommitQuery(_) => "commit-query",
            Self::Write(_) => "write",
        }
    }

    /// Expect an object-query page.
    pub fn into_objects(self) -> Result<Page<ObjectMetadata>, HubError> {
        match self {
            Self::ObjectQuery(page) => Ok(page),
            other => Err(unexpected("object-query", &other)),
        }
    }

    /// Expect a commit-query page.
    pub fn into_commits(self) -> Result<Page<SignedCommit>, HubError> {
        match self {
            Self::CommitQuery(page) => Ok(page),
            other => Err(unexpected("commit-query", &other)),
        }
    }

    /// Expect a write acknowledgement.
    pub fn into_write_ack(self) -> Result<WriteAck, HubError> {
        match self {
            Self::Write(ack) => Ok(ack),
            other => Err(unexpected("write", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &HubResponse) -> HubError {
    HubError::Transport(format!(
        "expected {expected} response, got {}",
        got.kind()
    ))
}
