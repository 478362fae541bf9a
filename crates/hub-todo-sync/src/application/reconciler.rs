//! # Commit Reconciler
//!
//! Reads the to-do collection back out of the Hub's commit log.
//!
//! ## Flow
//!
//! 1. Page through object metadata for the to-do scope
//! 2. Page through the commits of every discovered object
//! 3. Group commits by object, preserving server order
//! 4. Collapse each group with the commit strategy
//!
//! Every call re-reads the collection from scratch. With zero objects no
//! commit query is sent.

use std::sync::Arc;

use futures::Stream;
use tracing::{debug, info, warn};

use super::session::HubSession;
use crate::algorithms::{
    collect_pages, group_commits_by_object, paginate, BasicCommitStrategy, CommitGroup,
    CommitStrategy,
};
use crate::config::HubSyncConfig;
use crate::domain::{
    CommitQuery, DecodedCommit, HubError, HubRequest, ObjectMetadata, ObjectQuery, Page,
    SignedCommit, TodoItem, TodoPayload,
};

/// Rebuilds to-do items from commits.
pub struct CommitReconciler {
    session: Arc<HubSession>,
    strategy: Arc<dyn CommitStrategy>,
    config: HubSyncConfig,
}

impl CommitReconciler {
    /// Create a reconciler using the basic (last writer wins) strategy.
    pub fn new(session: Arc<HubSession>, config: HubSyncConfig) -> Self {
        Self {
            session,
            strategy: Arc::new(BasicCommitStrategy),
            config,
        }
    }

    /// Use a different commit strategy.
    pub fn with_strategy(mut self, strategy: Arc<dyn CommitStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Name of the active commit strategy.
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Lazy stream of object metadata pages for the to-do scope.
    pub fn object_pages(&self) -> impl Stream<Item = Result<Page<ObjectMetadata>, HubError>> {
        let session = Arc::clone(&self.session);
        let query = ObjectQuery::for_scope(&self.config.scope);

        paginate(move |skip_token| {
            let session = Arc::clone(&session);
            let request = HubRequest::ObjectQuery(query.clone().with_skip_token(skip_token));
            async move { session.send(request).await?.into_objects() }
        })
    }

    /// Lazy stream of commit pages for the given objects.
    pub fn commit_pages(
        &self,
        object_ids: Vec<String>,
    ) -> impl Stream<Item = Result<Page<SignedCommit>, HubError>> {
        let session = Arc::clone(&self.session);
        let query = CommitQuery::for_objects(object_ids);

        paginate(move |skip_token| {
            let session = Arc::clone(&session);
            let request = HubRequest::CommitQuery(query.clone().with_skip_token(skip_token));
            async move { session.send(request).await?.into_commits() }
        })
    }

    /// Ids of every to-do object, across all pages.
    pub async fn fetch_all_object_ids(&self) -> Result<Vec<String>, HubError> {
        let objects = collect_pages(self.object_pages(), self.config.max_pages).await?;
        debug!("[hub-sync] Discovered {} objects", objects.len());
        Ok(objects.into_iter().map(|object| object.id).collect())
    }

    /// Every commit for the given objects, across all pages.
    pub async fn fetch_commits(&self, object_ids: Vec<String>) -> Result<Vec<SignedCommit>, HubError> {
        let commits = collect_pages(self.commit_pages(object_ids), self.config.max_pages).await?;
        debug!("[hub-sync] Fetched {} commits", commits.len());
        Ok(commits)
    }

    /// Reconcile the whole collection into current to-do items.
    ///
    /// Any request failure aborts the fetch; no partial list is returned.
    /// Commits or payloads that cannot be decoded are skipped.
    pub async fn fetch_todos(&self) -> Result<Vec<TodoItem>, HubError> {
        let object_ids = self.fetch_all_object_ids().await?;
        if object_ids.is_empty() {
            info!("[hub-sync] No to-do objects found");
            return Ok(Vec::new());
        }

        let commits = self.fetch_commits(object_ids).await?;
        let groups = group_commits_by_object(open_commits(&commits));
        let todos = self.resolve_groups(groups);

        info!("[hub-sync] Reconciled {} to-do items", todos.len());
        Ok(todos)
    }

    /// Collapse commit groups into items, dropping deleted objects.
    pub fn resolve_groups(&self, groups: Vec<CommitGroup>) -> Vec<TodoItem> {
        groups
            .into_iter()
            .filter_map(|group| self.resolve_group(group))
            .collect()
    }

    fn resolve_group(&self, group: CommitGroup) -> Option<TodoItem> {
        if let Some(commit) = group
            .commits
            .iter()
            .find(|c| c.headers.commit_strategy != self.strategy.name())
        {
            debug!(
                "[hub-sync] Object {} has a {} commit, resolving with {}",
                group.object_id,
                commit.headers.commit_strategy,
                self.strategy.name()
            );
        }

        let state = self.strategy.resolve_object(&group.commits)?;
        match serde_json::from_value::<TodoPayload>(state) {
            Ok(payload) => Some(TodoItem::settled(group.object_id, payload.text, payload.done)),
            Err(e) => {
                warn!(
                    "[hub-sync] Skipping object {} with unreadable payload: {}",
                    group.object_id, e
                );
                None
            }
        }
    }
}

/// Decode signed commits, skipping the ones that cannot be opened.
fn open_commits(commits: &[SignedCommit]) -> Vec<DecodedCommit> {
    commits
        .iter()
        .filter_map(|signed| match signed.open() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("[hub-sync] Skipping malformed commit: {}", e);
                None
            }
        })
        .collect()
}
