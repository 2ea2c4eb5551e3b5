//! Bitbucket Cloud API client for the pull phase.
//!
//! This module lists the repositories of a workspace and fetches the
//! commits a configured user authored, following Bitbucket's cursor
//! pagination and tolerating late-page failures.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for Bitbucket API operations
//! - [`types`] - Response data structures
//! - [`client`] - Client creation and the paginated listing operations
//!
//! # Example
//!
//! ```ignore
//! use gitshadow::bitbucket::BitbucketClient;
//! use gitshadow::identity::CommitFilter;
//!
//! let client = BitbucketClient::new("my-workspace", "jane", "app-password")?;
//! let repos = client.list_repositories().await?;
//! let filter = CommitFilter::new(["jane@x.com".to_string()].into_iter().collect());
//! let commits = client.list_commits(&repos[0], &filter).await?;
//! ```

mod client;
mod error;
mod types;

pub use client::{BITBUCKET_API_URL, BitbucketClient};
pub use error::{BitbucketError, short_error_message};
pub use types::{CommitAuthor, CommitEntry, Page, RepositorySummary};
