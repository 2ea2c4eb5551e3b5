//! Shared sync types and constants.
//!
//! These are the domain types handed between the pull and push phases;
//! wire-level response types live with their respective host clients.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

/// Default name of the destination shadow repository.
pub const DEFAULT_SHADOW_REPOSITORY: &str = "BitbucketCommitsShadowContributions";

/// Branch on the shadow repository that replay commits advance.
pub const DEFAULT_BRANCH: &str = "main";

/// One qualifying source commit.
///
/// Immutable once fetched; lives for the duration of one run and is
/// discarded after replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Source content-address, unique within its repository.
    pub hash: String,
    /// Source-authoritative commit timestamp; the replay commit on the
    /// destination is author-dated to exactly this value.
    pub date: DateTime<FixedOffset>,
    /// Identity extracted from the free-text author field.
    pub author_email: String,
}

/// All qualifying commits of one source repository, in source pagination
/// order (oldest page first).
///
/// The sequence of these batches is the sole handoff artifact between the
/// pull and push phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCommitBatch {
    /// Source repository slug; doubles as the shadow file path.
    pub repository: String,
    pub commits: Vec<CommitRecord>,
}

/// User-configured pull-phase filters. Pure data, no mutation.
#[derive(Debug, Clone, Default)]
pub struct PullFilters {
    /// Identity emails belonging to the user.
    pub emails: HashSet<String>,
    /// Repository slugs to skip without any API call.
    pub ignore: HashSet<String>,
}

impl PullFilters {
    #[must_use]
    pub fn new(emails: HashSet<String>, ignore: HashSet<String>) -> Self {
        Self { emails, ignore }
    }

    #[must_use]
    pub fn is_ignored(&self, repository: &str) -> bool {
        self.ignore.contains(repository)
    }
}

/// Options for the push phase.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Destination shadow repository name.
    pub repository: String,
    /// Destination branch the replay commits advance.
    pub branch: String,
    /// Author name stamped on every replay commit.
    pub author_name: String,
    /// Author email stamped on every replay commit.
    pub author_email: String,
}

impl SyncOptions {
    /// Options with the default shadow repository and branch.
    #[must_use]
    pub fn new(author_name: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self {
            repository: DEFAULT_SHADOW_REPOSITORY.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            author_name: author_name.into(),
            author_email: author_email.into(),
        }
    }
}

/// Outcome of one repository's commit fetch inside the pull fan-out.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Repository is on the ignore list; no API call was made.
    Skipped,
    /// Fetch succeeded but no commit matched the identity filter.
    Empty,
    /// Fetch succeeded with at least one qualifying commit.
    Fetched(RepositoryCommitBatch),
    /// Fetch failed before yielding any data.
    Failed(String),
}

/// Aggregated result of the pull phase.
///
/// The batches are returned regardless of the failure tally; a failed
/// repository never discards its siblings' results.
#[derive(Debug, Default)]
pub struct PullReport {
    /// Non-empty batches, one per source repository with qualifying commits.
    pub batches: Vec<RepositoryCommitBatch>,
    /// Repositories whose fetch completed without error.
    pub fetched: usize,
    /// Of those, repositories that yielded zero qualifying commits.
    pub empty: usize,
    /// Repositories skipped via the ignore list.
    pub skipped: usize,
    /// Per-repository fetch failures (non-fatal).
    pub errors: Vec<String>,
}

impl PullReport {
    /// Aggregate success flag; observational only.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn total_commits(&self) -> usize {
        self.batches.iter().map(|b| b.commits.len()).sum()
    }
}

/// Per-repository outcome of the push phase.
#[derive(Debug, PartialEq, Eq)]
pub struct RepositorySynced {
    pub repository: String,
    /// Replay commits actually created; idempotent skips do not count.
    pub added: usize,
}

/// Aggregated result of the push phase.
#[derive(Debug, Default)]
pub struct PushReport {
    pub repositories: Vec<RepositorySynced>,
}

impl PushReport {
    #[must_use]
    pub fn total_added(&self) -> usize {
        self.repositories.iter().map(|r| r.added).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            date: DateTime::parse_from_rfc3339("2021-03-09T08:41:43+00:00")
                .expect("valid timestamp"),
            author_email: "jane@x.com".to_string(),
        }
    }

    #[test]
    fn sync_options_new_uses_default_repository_and_branch() {
        let options = SyncOptions::new("Jane", "jane@x.com");

        assert_eq!(options.repository, DEFAULT_SHADOW_REPOSITORY);
        assert_eq!(options.branch, "main");
        assert_eq!(options.author_name, "Jane");
        assert_eq!(options.author_email, "jane@x.com");
    }

    #[test]
    fn pull_report_default_is_empty_success() {
        let report = PullReport::default();

        assert!(report.all_succeeded());
        assert!(report.batches.is_empty());
        assert_eq!(report.total_commits(), 0);
    }

    #[test]
    fn pull_report_counts_commits_across_batches() {
        let report = PullReport {
            batches: vec![
                RepositoryCommitBatch {
                    repository: "alpha".to_string(),
                    commits: vec![record("a1"), record("a2")],
                },
                RepositoryCommitBatch {
                    repository: "beta".to_string(),
                    commits: vec![record("b1")],
                },
            ],
            fetched: 2,
            ..Default::default()
        };

        assert_eq!(report.total_commits(), 3);
        assert!(report.all_succeeded());
    }

    #[test]
    fn pull_report_with_errors_is_not_a_full_success() {
        let report = PullReport {
            errors: vec!["gamma: http transport error: timeout".to_string()],
            ..Default::default()
        };

        assert!(!report.all_succeeded());
    }

    #[test]
    fn push_report_sums_added_commits() {
        let report = PushReport {
            repositories: vec![
                RepositorySynced {
                    repository: "alpha".to_string(),
                    added: 3,
                },
                RepositorySynced {
                    repository: "beta".to_string(),
                    added: 0,
                },
            ],
        };

        assert_eq!(report.total_added(), 3);
    }

    #[test]
    fn pull_filters_ignore_membership() {
        let filters = PullFilters::new(
            HashSet::new(),
            ["infra-scripts".to_string()].into_iter().collect(),
        );

        assert!(filters.is_ignored("infra-scripts"));
        assert!(!filters.is_ignored("api"));
    }
}
