//! # Commit Grouping
//!
//! Partitions a flat commit list into per-object commit logs.

use std::collections::HashMap;

use crate::domain::{Commit, DecodedCommit};

/// The ordered commits of one object.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitGroup {
    /// Object the commits address.
    pub object_id: String,
    /// Commits in server return order.
    pub commits: Vec<Commit>,
}

/// Group commits by object id.
///
/// Groups appear in order of each object's first commit, and commits keep
/// the order the server returned them in. Nothing is re-sorted by
/// timestamp.
pub fn group_commits_by_object(
    commits: impl IntoIterator<Item = DecodedCommit>,
) -> Vec<CommitGroup> {
    let mut groups: Vec<CommitGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for decoded in commits {
        match index.get(&decoded.object_id) {
            Some(&slot) => groups[slot].commits.push(decoded.commit),
            None => {
                index.insert(decoded.object_id.clone(), groups.len());
                groups.push(CommitGroup {
                    object_id: decoded.object_id,
                    commits: vec![decoded.commit],
                });
            }
        }
    }

    groups
}
