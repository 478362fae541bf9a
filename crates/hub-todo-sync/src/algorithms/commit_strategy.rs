//! # Commit Strategies
//!
//! Deterministic folds from an object's ordered commit log to its current
//! state.

use serde_json::Value;

use crate::domain::{Commit, Operation, BASIC_COMMIT_STRATEGY};

/// Folds an ordered commit log into the object's current state.
///
/// Implementations must be deterministic and side-effect free: the same
/// commit list always resolves to the same value.
pub trait CommitStrategy: Send + Sync {
    /// Strategy tag as written into commit headers.
    fn name(&self) -> &str;

    /// Resolve the object's state; `None` means the object no longer exists.
    fn resolve_object(&self, commits: &[Commit]) -> Option<Value>;
}

/// Last-writer-wins on the commit list.
///
/// The last commit in list order decides: a `create` or `update` payload
/// replaces all prior state, a `delete` removes the object. Ties between
/// devices are broken by list order alone, never by timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicCommitStrategy;

impl CommitStrategy for BasicCommitStrategy {
    fn name(&self) -> &str {
        BASIC_COMMIT_STRATEGY
    }

    fn resolve_object(&self, commits: &[Commit]) -> Option<Value> {
        let last = commits.last()?;
        match last.operation() {
            Operation::Delete => None,
            Operation::Create | Operation::Update => Some(last.payload.clone()),
        }
    }
}
