//! GitHub API client for the push phase.
//!
//! This module writes synthetic commits into the shadow repository through
//! GitHub's git database API: blobs, trees, commit objects and branch
//! refs, plus repository existence checks and creation.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Request and response data structures
//! - [`client`] - Client creation and the object-graph operations
//!
//! # Example
//!
//! ```ignore
//! use gitshadow::github::{GitHubClient, NewTreeEntry};
//!
//! let client = GitHubClient::new("jane", "ghp_token")?;
//! let head = client.latest_commit("shadow-repo", "main").await?;
//! let entries = vec![NewTreeEntry::file("ledger.txt", "abc123")];
//! let tree = client.create_tree("shadow-repo", entries, Some(&head.commit.tree.sha)).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{GITHUB_API_URL, GitHubClient};
pub use error::{GitHubError, short_error_message};
pub use types::{
    Blob, CommitInfo, CommitSignature, HeadCommit, NewBlob, NewCommit, NewRepository, NewTree,
    NewTreeEntry, RefUpdate, Tree, TreeEntry, TreeRef,
};
