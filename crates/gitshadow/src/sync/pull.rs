//! Pull phase: concurrent commit fetch from the source workspace.

use crate::bitbucket::{BitbucketClient, BitbucketError, short_error_message};
use crate::identity::CommitFilter;
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::{FetchOutcome, PullFilters, PullReport, RepositoryCommitBatch};

/// List the workspace and fetch every repository's qualifying commits.
///
/// Repository fetches fan out with one task per repository, all in flight
/// at once, and the loop below settles every task before returning. A
/// failed repository lands in [`PullReport::errors`] without disturbing
/// its siblings; only a failure to list the workspace itself aborts the
/// phase. Repositories on the ignore list are answered locally, without a
/// single API call.
///
/// Batches appear in the report in workspace listing order, and empty
/// results are dropped rather than forwarded as empty batches.
#[tracing::instrument(skip_all, fields(workspace = %client.workspace()))]
pub async fn pull_all(
    client: &BitbucketClient,
    filters: &PullFilters,
    on_progress: Option<&ProgressCallback>,
) -> Result<PullReport, BitbucketError> {
    emit(
        on_progress,
        SyncProgress::ListingRepositories {
            workspace: client.workspace().to_string(),
        },
    );

    let repositories = client.list_repositories().await?;

    emit(
        on_progress,
        SyncProgress::RepositoriesListed {
            workspace: client.workspace().to_string(),
            total: repositories.len(),
        },
    );
    emit(
        on_progress,
        SyncProgress::FetchingCommits {
            repositories: repositories.len(),
        },
    );

    let filter = CommitFilter::new(filters.emails.clone());
    let mut handles = Vec::with_capacity(repositories.len());

    for repository in repositories {
        let client = client.clone();
        let filter = filter.clone();
        let ignored = filters.is_ignored(&repository);

        let handle = tokio::spawn(async move {
            if ignored {
                return (repository, FetchOutcome::Skipped);
            }

            match client.list_commits(&repository, &filter).await {
                Ok(commits) if commits.is_empty() => (repository, FetchOutcome::Empty),
                Ok(commits) => {
                    let batch = RepositoryCommitBatch {
                        repository: repository.clone(),
                        commits,
                    };
                    (repository, FetchOutcome::Fetched(batch))
                }
                Err(e) => (repository, FetchOutcome::Failed(short_error_message(&e))),
            }
        });

        handles.push(handle);
    }

    let mut report = PullReport::default();

    for handle in handles {
        match handle.await {
            Ok((repository, FetchOutcome::Skipped)) => {
                report.skipped += 1;
                emit(on_progress, SyncProgress::RepositoryIgnored { repository });
            }
            Ok((repository, FetchOutcome::Empty)) => {
                report.fetched += 1;
                report.empty += 1;
                emit(on_progress, SyncProgress::RepositoryEmpty { repository });
            }
            Ok((repository, FetchOutcome::Fetched(batch))) => {
                report.fetched += 1;
                emit(
                    on_progress,
                    SyncProgress::RepositoryFetched {
                        repository,
                        commits: batch.commits.len(),
                    },
                );
                report.batches.push(batch);
            }
            Ok((repository, FetchOutcome::Failed(error))) => {
                report.errors.push(format!("{}: {}", repository, error));
                emit(
                    on_progress,
                    SyncProgress::RepositoryFetchFailed { repository, error },
                );
            }
            Err(e) => {
                report.errors.push(format!("Task panic: {}", e));
            }
        }
    }

    emit(
        on_progress,
        SyncProgress::FetchCompleted {
            fetched: report.fetched,
            empty: report.empty,
            skipped: report.skipped,
            failed: report.errors.len(),
        },
    );

    Ok(report)
}
