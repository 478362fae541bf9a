//! # Hub To-Do Sync
//!
//! Synchronizes a to-do list with a user's Identity Hub.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A to-do list stored as an append-only log of signed commits in the Hub
//! that a DID names. This crate:
//! - Discovers the Hub from the user's DID document and opens a session
//! - Pages through objects and commits and folds them back into items
//! - Writes signed create/update/delete commits
//! - Exposes an optimistic, observable model for a UI shell
//!
//! ## Data Flow
//!
//! | Step | Component | Talks to |
//! |------|-----------|----------|
//! | connect | [`HubConnector`] | [`DidResolver`], [`HubTransport`] |
//! | read | [`CommitReconciler`] | [`HubSession`] |
//! | write | [`HubStore`] | [`CommitSigner`], [`HubSession`] |
//! | present | [`TodoModel`] | [`TodoStoreApi`] |
//!
//! ## Module Structure
//!
//! ```text
//! hub-todo-sync/
//! ├── domain/          # Items, commits, wire messages, errors
//! ├── algorithms/      # Endpoint normalization, grouping, strategy, paging
//! ├── ports/           # API trait (inbound) + dependency traits (outbound)
//! ├── adapters/        # HS256 signer, in-memory Hub, static resolver
//! ├── application/     # Bootstrap, reconciler, store, model
//! ├── config.rs        # Connection options and sync settings
//! └── telemetry.rs     # tracing-subscriber setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

// Re-exports
pub use adapters::{Hs256CommitSigner, InMemoryHub, StaticResolver};
pub use algorithms::{
    collect_pages, group_commits_by_object, normalize_hub_endpoint, paginate,
    BasicCommitStrategy, CommitGroup, CommitStrategy,
};
pub use application::{
    CommitReconciler, HubConnector, HubSession, HubStore, Subscription, TodoModel,
};
pub use config::{ClientKey, HubConnectionOptions, HubSyncConfig};
pub use domain::{
    Commit, CommitHeaders, CommitScope, DidDocument, HubError, HubRequest, HubResponse,
    ItemOperation, ItemState, LocalId, ObjectMetadata, Operation, Page, SignedCommit, TodoItem,
    TodoPayload, WriteAck,
};
pub use ports::{CommitSigner, DidResolver, HubTransport, SessionContext, TodoStoreApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
