//! # Algorithms Module
//!
//! Core sync algorithms: endpoint normalization, pagination, commit
//! grouping and commit-strategy resolution.

pub mod commit_strategy;
pub mod endpoint;
pub mod grouping;
pub mod pagination;

pub use commit_strategy::{BasicCommitStrategy, CommitStrategy};
pub use endpoint::normalize_hub_endpoint;
pub use grouping::{group_commits_by_object, CommitGroup};
pub use pagination::{collect_pages, paginate};
