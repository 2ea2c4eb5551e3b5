//! Progress reporting types for sync operations.
//!
//! This module provides a unified progress event system used by both sync
//! phases to report progress to the UI without coupling the engine to any
//! particular output style.

/// Progress events emitted during a sync run.
///
/// Pull-phase events describe the concurrent commit fetch from the source
/// workspace; push-phase events describe the sequential replay into the
/// shadow repository.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting to list the repositories of the source workspace.
    ListingRepositories {
        /// The workspace being listed.
        workspace: String,
    },

    /// Finished listing the source workspace.
    RepositoriesListed {
        /// The workspace that was listed.
        workspace: String,
        /// Number of repositories found.
        total: usize,
    },

    /// Starting the concurrent commit fetch.
    FetchingCommits {
        /// Number of repositories the fetch fans out over.
        repositories: usize,
    },

    /// A repository was skipped because it is on the ignore list.
    RepositoryIgnored {
        /// Repository slug.
        repository: String,
    },

    /// Fetched the commits of one repository.
    RepositoryFetched {
        /// Repository slug.
        repository: String,
        /// Number of commits that matched the author filter.
        commits: usize,
    },

    /// A repository had no commits matching the author filter.
    RepositoryEmpty {
        /// Repository slug.
        repository: String,
    },

    /// Failed to fetch the commits of one repository.
    RepositoryFetchFailed {
        /// Repository slug.
        repository: String,
        /// Short error message.
        error: String,
    },

    /// The commit fetch finished for all repositories.
    FetchCompleted {
        /// Repositories whose fetch completed without error.
        fetched: usize,
        /// Of those, repositories with no matching commits.
        empty: usize,
        /// Repositories skipped via the ignore list.
        skipped: usize,
        /// Repositories whose fetch failed.
        failed: usize,
    },

    /// The shadow repository is absent and is being created.
    CreatingShadowRepository {
        /// Name of the repository being created.
        repository: String,
    },

    /// Starting to replay one repository's commit batch.
    SyncingRepository {
        /// Position in the batch list (1-indexed).
        index: usize,
        /// Total number of batches.
        total: usize,
        /// Source repository slug.
        repository: String,
    },

    /// One commit was replayed into the shadow repository.
    CommitReplayed {
        /// Source repository slug.
        repository: String,
        /// Source commit hash.
        hash: String,
    },

    /// Finished replaying one repository's batch.
    RepositorySynced {
        /// Source repository slug.
        repository: String,
        /// Number of commits newly added.
        added: usize,
    },

    /// The push phase finished.
    PushCompleted {
        /// Number of repositories replayed.
        repositories: usize,
        /// Total commits newly added across all batches.
        commits: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// This is a convenience function to avoid repetitive `if let Some(cb) = ...` patterns.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_invokes_the_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::FetchingCommits { repositories: 3 },
        );
        emit(
            Some(&callback),
            SyncProgress::FetchCompleted {
                fetched: 2,
                empty: 1,
                skipped: 0,
                failed: 0,
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn emit_without_callback_does_nothing() {
        emit(
            None,
            SyncProgress::RepositoryIgnored {
                repository: "legacy".to_string(),
            },
        );
    }

    #[test]
    fn events_record_in_emission_order() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);

        let callback: ProgressCallback = Box::new(move |event| {
            events_clone.lock().unwrap().push(format!("{:?}", event));
        });

        emit(
            Some(&callback),
            SyncProgress::ListingRepositories {
                workspace: "acme".to_string(),
            },
        );
        emit(
            Some(&callback),
            SyncProgress::RepositoriesListed {
                workspace: "acme".to_string(),
                total: 2,
            },
        );
        emit(
            Some(&callback),
            SyncProgress::RepositoryFetched {
                repository: "api".to_string(),
                commits: 5,
            },
        );

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("ListingRepositories"));
        assert!(recorded[1].contains("RepositoriesListed"));
        assert!(recorded[2].contains("RepositoryFetched"));
    }

    #[test]
    fn progress_events_are_cloneable_and_debuggable() {
        let event = SyncProgress::RepositorySynced {
            repository: "api".to_string(),
            added: 4,
        };
        let cloned = event.clone();

        let debug_str = format!("{:?}", cloned);
        assert!(debug_str.contains("RepositorySynced"));
        assert!(debug_str.contains("api"));
        assert!(debug_str.contains('4'));
    }
}
