//! Error types for the push phase.

use thiserror::Error;

use crate::github::GitHubError;

/// Errors that stop a push run.
///
/// The push phase is fail-stop: the first error aborts the run and
/// surfaces here, with already-applied commits left in place. Each variant
/// carries the underlying API failure as its source.
#[derive(Debug, Error)]
pub enum PushError {
    /// The shadow repository was absent and could not be set up.
    #[error("failed to initialize shadow repository '{repository}'")]
    Initialization {
        repository: String,
        #[source]
        source: GitHubError,
    },

    /// The current content of a shadow file could not be resolved.
    #[error("failed to resolve shadow file '{path}'")]
    Resolve {
        path: String,
        #[source]
        source: GitHubError,
    },

    /// A replay step failed partway through a batch.
    #[error("failed to replay commit {hash} into shadow file '{path}'")]
    Replay {
        path: String,
        hash: String,
        #[source]
        source: GitHubError,
    },
}
