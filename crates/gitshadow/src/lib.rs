//! Gitshadow - mirror Bitbucket commit activity onto GitHub.
//!
//! This library pulls the commits a user authored across a Bitbucket
//! workspace and replays each one as a synthetic, date-preserving commit
//! in a private GitHub "shadow" repository, so that activity shows up on
//! the user's GitHub contribution graph. Replayed commit hashes are
//! recorded in per-repository ledger files inside the shadow repository
//! itself, which makes every run idempotent.
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
//! let filters = PullFilters::new(emails, ignored);
//! let pulled = pull_all(&source, &filters, None).await?;
//!
//! let options = SyncOptions::new("Jane Doe", "jane@x.com");
//! let pushed = push_batches(&destination, &pulled.batches, &options, None).await?;
//! println!("Added {} commits", pushed.total_added());
//! ```

pub mod bitbucket;
pub mod github;
pub mod http;
pub mod identity;
pub mod shadow;
pub mod sync;

pub use bitbucket::BitbucketClient;
pub use github::GitHubClient;
pub use shadow::ShadowFile;
pub use sync::{PullFilters, PullReport, PushError, PushReport, SyncOptions};
