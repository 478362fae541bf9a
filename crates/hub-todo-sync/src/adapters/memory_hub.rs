//! In-Memory Hub Adapter
//!
//! Implements `HubTransport` with an in-process Hub: an append-only commit
//! log, Hub-assigned object ids and offset-token pagination. Used for local
//! setups and tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::{
    CommitQuery, HubError, HubRequest, HubResponse, ObjectMetadata, ObjectQuery, Operation, Page,
    SignedCommit, WriteAck,
};
use crate::ports::outbound::{HubTransport, SessionContext};

/// Default number of items per page.
const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Default)]
struct HubState {
    /// Object metadata in creation order.
    objects: Vec<ObjectMetadata>,
    /// Commit log in append order.
    commits: Vec<SignedCommit>,
    /// Every request received, in order.
    requests: Vec<HubRequest>,
    /// Ordinals of requests that should fail.
    failing_requests: HashSet<usize>,
}

/// In-process Identity Hub.
pub struct InMemoryHub {
    hub_did: String,
    endpoint: String,
    page_size: usize,
    offline: AtomicBool,
    state: Mutex<HubState>,
}

impl InMemoryHub {
    /// Create a Hub answering to the given DID and endpoint.
    pub fn new(hub_did: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            hub_did: hub_did.into(),
            endpoint: endpoint.into(),
            page_size: DEFAULT_PAGE_SIZE,
            offline: AtomicBool::new(false),
            state: Mutex::new(HubState::default()),
        }
    }

    /// Set the number of items per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// DID of this Hub.
    pub fn hub_did(&self) -> &str {
        &self.hub_did
    }

    /// Endpoint of this Hub.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Simulate the Hub being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the request with the given 0-based ordinal fail.
    pub fn fail_request_at(&self, ordinal: usize) {
        self.state.lock().failing_requests.insert(ordinal);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HubRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of requests of a kind (`object-query`, `commit-query`, `write`).
    pub fn request_count(&self, kind: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.kind() == kind)
            .count()
    }

    /// Number of commits in the log.
    pub fn commit_count(&self) -> usize {
        self.state.lock().commits.len()
    }

    /// Append a commit directly, as another device writing to the same
    /// collection would.
    pub fn append(&self, commit: SignedCommit) -> Result<WriteAck, HubError> {
        let mut state = self.state.lock();
        Self::append_locked(&mut state, commit)
    }

    fn append_locked(state: &mut HubState, commit: SignedCommit) -> Result<WriteAck, HubError> {
        let decoded = commit
            .open()
            .map_err(|e| HubError::Transport(format!("Hub rejected commit: {e}")))?;
        let headers = &decoded.commit.headers;

        match headers.operation {
            Operation::Create => state.objects.push(ObjectMetadata {
                id: decoded.object_id.clone(),
                interface: headers.interface.clone(),
                context: headers.context.clone(),
                object_type: headers.object_type.clone(),
                created_by: headers.iss.clone(),
            }),
            Operation::Update | Operation::Delete => {
                if !state.objects.iter().any(|o| o.id == decoded.object_id) {
                    return Err(HubError::Transport(format!(
                        "Hub rejected commit: unknown object {}",
                        decoded.object_id
                    )));
                }
            }
        }

        state.commits.push(commit);
        Ok(WriteAck {
            revisions: vec![decoded.revision],
        })
    }

    fn page<T: Clone>(&self, items: &[T], skip_token: Option<&str>) -> Result<Page<T>, HubError> {
        let offset = match skip_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| HubError::Transport(format!("invalid skip token {token}")))?,
        };
        let end = offset.saturating_add(self.page_size).min(items.len());
        let slice = items.get(offset..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page::new(slice, next))
    }

    fn query_objects(&self, state: &HubState, query: &ObjectQuery) -> Result<Page<ObjectMetadata>, HubError> {
        let matching: Vec<ObjectMetadata> = state
            .objects
            .iter()
            .filter(|o| {
                o.interface == query.interface
                    && o.context == query.context
                    && o.object_type == query.object_type
            })
            .cloned()
            .collect();
        self.page(&matching, query.skip_token.as_deref())
    }

    fn query_commits(&self, state: &HubState, query: &CommitQuery) -> Result<Page<SignedCommit>, HubError> {
        let wanted: HashSet<&str> = query.object_ids.iter().map(String::as_str).collect();
        let matching: Vec<SignedCommit> = state
            .commits
            .iter()
            .filter(|c| {
                c.object_id()
                    .map(|id| wanted.contains(id.as_str()))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        self.page(&matching, query.skip_token.as_deref())
    }
}

#[async_trait]
impl HubTransport for InMemoryHub {
    async fn send(
        &self,
        context: &SessionContext,
        request: HubRequest,
    ) -> Result<HubResponse, HubError> {
        let mut state = self.state.lock();
        let ordinal = state.requests.len();
        state.requests.push(request.clone());

        debug!(
            "[hub-sync] In-memory Hub received {} request #{}",
            request.kind(),
            ordinal
        );

        if self.offline.load(Ordering::SeqCst) || state.failing_requests.remove(&ordinal) {
            warn!("[hub-sync] In-memory Hub dropping request #{}", ordinal);
            return Err(HubError::Transport(format!(
                "Hub at {} did not answer",
                context.hub_endpoint
            )));
        }

        if context.hub_did != self.hub_did || context.hub_endpoint != self.endpoint {
            return Err(HubError::Transport(format!(
                "request for {} at {} reached {} at {}",
                context.hub_did, context.hub_endpoint, self.hub_did, self.endpoint
            )));
        }

        match request {
            HubRequest::ObjectQuery(query) => {
                self.query_objects(&state, &query).map(HubResponse::ObjectQuery)
            }
            HubRequest::CommitQuery(query) => {
                self.query_commits(&state, &query).map(HubResponse::CommitQuery)
            }
            HubRequest::Write { commit } => {
                let subject = commit
                    .protected_header()
                    .map(|h| h.headers.sub)
                    .map_err(|e| HubError::Transport(format!("Hub rejected commit: {e}")))?;
                if subject != context.target_did {
                    return Err(HubError::Transport(format!(
                        "commit subject {subject} does not match session target {}",
                        context.target_did
                    )));
                }
                Self::append_locked(&mut state, commit).map(HubResponse::Write)
            }
        }
    }
}
