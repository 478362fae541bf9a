//! # Todo Store
//!
//! Write path for the to-do collection: builds standard commits, signs them
//! and sends them to the Hub. Reads are delegated to the reconciler.
//!
//! | Operation | `object_id` header | Payload             |
//! |-----------|--------------------|---------------------|
//! | create    | absent             | `{text, done:false}`|
//! | update    | target object      | `{text, done}`      |
//! | delete    | target object      | `{}`                |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use super::reconciler::CommitReconciler;
use super::session::HubSession;
use crate::config::HubSyncConfig;
use crate::domain::{
    Commit, CommitHeaders, CommitScope, HubError, HubRequest, Operation, TodoItem, WriteAck,
};
use crate::ports::{CommitSigner, TodoStoreApi};

/// To-do store bound to one Hub session.
pub struct HubStore {
    session: Arc<HubSession>,
    signer: Arc<dyn CommitSigner>,
    reconciler: CommitReconciler,
    scope: CommitScope,
}

impl HubStore {
    /// Create a store.
    pub fn new(
        session: Arc<HubSession>,
        signer: Arc<dyn CommitSigner>,
        config: HubSyncConfig,
    ) -> Self {
        let scope = config.scope.clone();
        Self {
            reconciler: CommitReconciler::new(Arc::clone(&session), config),
            session,
            signer,
            scope,
        }
    }

    /// Session the store writes through.
    pub fn session(&self) -> &HubSession {
        &self.session
    }

    /// Reconciler used for reads.
    pub fn reconciler(&self) -> &CommitReconciler {
        &self.reconciler
    }

    /// Standard headers for a commit to the client's own collection,
    /// stamped with the current time.
    pub fn standard_headers(&self, operation: Operation, object_id: Option<&str>) -> CommitHeaders {
        CommitHeaders::new(
            self.session.client_did(),
            &self.scope,
            operation,
            object_id,
            Utc::now(),
        )
    }

    /// Sign and send one commit.
    async fn write(&self, commit: Commit) -> Result<WriteAck, HubError> {
        let operation = commit.operation();

        let signed = self.signer.sign(&commit).await.map_err(|e| match e {
            HubError::Signing(_) => e,
            other => HubError::Signing(other.to_string()),
        })?;

        let ack = self
            .session
            .send(HubRequest::Write { commit: signed })
            .await?
            .into_write_ack()?;

        debug!(
            "[hub-sync] {} commit acknowledged with {} revisions",
            operation.as_str(),
            ack.revisions.len()
        );
        Ok(ack)
    }
}

#[async_trait]
impl TodoStoreApi for HubStore {
    async fn fetch_todos(&self) -> Result<Vec<TodoItem>, HubError> {
        self.reconciler.fetch_todos().await
    }

    async fn create_todo(&self, text: &str) -> Result<String, HubError> {
        let commit = Commit::new(
            self.standard_headers(Operation::Create, None),
            json!({ "text": text, "done": false }),
        );

        let ack = self.write(commit).await?;
        let object_id = ack.revisions.into_iter().next().ok_or_else(|| {
            HubError::Transport("Hub acknowledged create without a revision".to_string())
        })?;

        info!("[hub-sync] Created to-do {}", object_id);
        Ok(object_id)
    }

    async fn update_todo(
        &self,
        object_id: &str,
        text: &str,
        done: bool,
    ) -> Result<WriteAck, HubError> {
        let commit = Commit::new(
            self.standard_headers(Operation::Update, Some(object_id)),
            json!({ "text": text, "done": done }),
        );

        let ack = self.write(commit).await?;
        info!("[hub-sync] Updated to-do {} (done: {})", object_id, done);
        Ok(ack)
    }

    async fn delete_todo(&self, object_id: &str) -> Result<WriteAck, HubError> {
        let commit = Commit::new(
            self.standard_headers(Operation::Delete, Some(object_id)),
            json!({}),
        );

        let ack = self.write(commit).await?;
        info!("[hub-sync] Deleted to-do {}", object_id);
        Ok(ack)
    }
}
