//! The two-phase sync engine.
//!
//! This module drives the whole mirroring run: a concurrent pull phase
//! that collects qualifying commits from the source workspace, and a
//! strictly sequential push phase that replays them into the shadow
//! repository on the destination host.
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `CommitRecord`, `PullReport`, `SyncOptions`, constants
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`pull`] - Concurrent commit fetch: `pull_all()`
//! - [`push`] - Sequential commit replay: `push_batches()`
//! - [`error`] - Push-phase errors: `PushError`
//!
//! # Example
//!
//! ```ignore
//! use gitshadow::bitbucket::BitbucketClient;
//! use gitshadow::github::GitHubClient;
//! use gitshadow::sync::{PullFilters, SyncOptions, pull_all, push_batches};
//!
//! let source = BitbucketClient::new("my-workspace", "jane", "app-password")?;
//! let destination = GitHubClient::new("jane", "ghp_token")?;
//!
//! let report = pull_all(&source, &filters, None).await?;
//! let pushed = push_batches(&destination, &report.batches, &options, None).await?;
//! println!("Added {} commits", pushed.total_added());
//! ```

mod error;
mod progress;
mod pull;
mod push;
mod types;

// Re-export types
pub use types::{
    CommitRecord, FetchOutcome, PullFilters, PullReport, PushReport, RepositoryCommitBatch,
    RepositorySynced, SyncOptions,
};

// Re-export constants
pub use types::{DEFAULT_BRANCH, DEFAULT_SHADOW_REPOSITORY};

// Re-export progress types
pub use progress::{ProgressCallback, SyncProgress, emit};

// Re-export phase entry points and errors
pub use error::PushError;
pub use pull::pull_all;
pub use push::push_batches;
