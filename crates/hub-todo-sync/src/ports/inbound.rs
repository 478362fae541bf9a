//! # Inbound Ports
//!
//! API trait defining what the to-do store offers the model layer.

use async_trait::async_trait;

use crate::domain::{HubError, TodoItem, WriteAck};

/// To-do store API - inbound port.
#[async_trait]
pub trait TodoStoreApi: Send + Sync {
    /// Fetch and reconcile every to-do in the collection.
    async fn fetch_todos(&self) -> Result<Vec<TodoItem>, HubError>;

    /// Commit a new to-do; returns the Hub-assigned object id.
    async fn create_todo(&self, text: &str) -> Result<String, HubError>;

    /// Commit the current text and done state of a to-do.
    async fn update_todo(
        &self,
        object_id: &str,
        text: &str,
        done: bool,
    ) -> Result<WriteAck, HubError>;

    /// Commit the deletion of a to-do.
    async fn delete_todo(&self, object_id: &str) -> Result<WriteAck, HubError>;
}
