//! Push phase: sequential replay into the shadow repository.

use crate::github::{CommitSignature, GitHubClient, NewCommit, NewRepository, NewTreeEntry};
use crate::shadow::ShadowFile;
use crate::sync::error::PushError;
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::{PushReport, RepositoryCommitBatch, RepositorySynced, SyncOptions};

/// Description stamped on an auto-created shadow repository.
const SHADOW_REPOSITORY_DESCRIPTION: &str = "Created by gitshadow";

/// Replay every batch of source commits into the shadow repository.
///
/// The whole phase is strictly sequential: batches run one after another
/// and, within a batch, each commit's object chain (tree, commit, ref
/// move) completes before the next hash is considered. The branch head is
/// re-fetched before every replayed commit, so each new commit parents the
/// previous one. The first error stops the run; commits already replayed
/// stay in place and a later run skips them through the shadow file.
#[tracing::instrument(skip_all, fields(repository = %options.repository, batches = batches.len()))]
pub async fn push_batches(
    client: &GitHubClient,
    batches: &[RepositoryCommitBatch],
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<PushReport, PushError> {
    let mut report = PushReport::default();
    if batches.is_empty() {
        return Ok(report);
    }

    ensure_shadow_repository(client, options, on_progress).await?;

    let total = batches.len();
    for (index, batch) in batches.iter().enumerate() {
        emit(
            on_progress,
            SyncProgress::SyncingRepository {
                index: index + 1,
                total,
                repository: batch.repository.clone(),
            },
        );

        let added = replay_batch(client, options, batch, on_progress).await?;

        emit(
            on_progress,
            SyncProgress::RepositorySynced {
                repository: batch.repository.clone(),
                added,
            },
        );
        report.repositories.push(RepositorySynced {
            repository: batch.repository.clone(),
            added,
        });
    }

    emit(
        on_progress,
        SyncProgress::PushCompleted {
            repositories: report.repositories.len(),
            commits: report.total_added(),
        },
    );

    Ok(report)
}

/// Make sure the shadow repository exists, creating it if absent.
///
/// Creation uses `auto_init` so the branch has an initial commit for the
/// first replay to parent on. Any failure here is fatal for the run.
async fn ensure_shadow_repository(
    client: &GitHubClient,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<(), PushError> {
    let init_err = |source| PushError::Initialization {
        repository: options.repository.clone(),
        source,
    };

    if client
        .repository_exists(&options.repository)
        .await
        .map_err(init_err)?
    {
        return Ok(());
    }

    emit(
        on_progress,
        SyncProgress::CreatingShadowRepository {
            repository: options.repository.clone(),
        },
    );
    tracing::info!(repository = %options.repository, "creating shadow repository");

    let new_repo = NewRepository {
        name: options.repository.clone(),
        description: SHADOW_REPOSITORY_DESCRIPTION.to_string(),
        private: true,
        auto_init: true,
    };
    client.create_repository(&new_repo).await.map_err(init_err)
}

/// Fetch the current content of the shadow file tracking `path`.
///
/// Walks head commit, then its tree, then the blob. A missing tree entry
/// means the file was never written and yields an empty ledger; any API
/// failure along the walk is fatal.
async fn resolve_shadow_file(
    client: &GitHubClient,
    options: &SyncOptions,
    path: &str,
) -> Result<ShadowFile, PushError> {
    let resolve_err = |source| PushError::Resolve {
        path: path.to_string(),
        source,
    };

    let head = client
        .latest_commit(&options.repository, &options.branch)
        .await
        .map_err(resolve_err)?;
    let tree = client
        .tree(&options.repository, &head.commit.tree.sha)
        .await
        .map_err(resolve_err)?;

    let Some(blob_sha) = tree.entry_sha(path) else {
        return Ok(ShadowFile::empty());
    };

    let blob = client
        .blob(&options.repository, blob_sha)
        .await
        .map_err(resolve_err)?;
    Ok(ShadowFile::new(blob.decode().map_err(resolve_err)?))
}

/// Replay one repository's commits, returning how many were added.
///
/// Hashes already present in the shadow file are skipped. For each new
/// hash the ledger is extended and committed: fresh head, tree layered on
/// that head's tree, commit authored at the source commit's date, ref
/// moved without force.
async fn replay_batch(
    client: &GitHubClient,
    options: &SyncOptions,
    batch: &RepositoryCommitBatch,
    on_progress: Option<&ProgressCallback>,
) -> Result<usize, PushError> {
    let path = batch.repository.as_str();
    let mut shadow = resolve_shadow_file(client, options, path).await?;
    let mut added = 0;

    for commit in &batch.commits {
        if !shadow.record(&commit.hash) {
            tracing::debug!(repository = path, hash = %commit.hash, "already replayed, skipping");
            continue;
        }

        let step_err = |source| PushError::Replay {
            path: path.to_string(),
            hash: commit.hash.clone(),
            source,
        };

        let head = client
            .latest_commit(&options.repository, &options.branch)
            .await
            .map_err(step_err)?;

        let entries = vec![NewTreeEntry::file(path, shadow.as_str())];
        let tree_sha = client
            .create_tree(&options.repository, entries, Some(&head.commit.tree.sha))
            .await
            .map_err(step_err)?;

        let new_commit = NewCommit {
            message: format!("Update {}", path),
            tree: tree_sha,
            parents: vec![head.sha],
            author: CommitSignature {
                name: options.author_name.clone(),
                email: options.author_email.clone(),
                date: commit.date,
            },
        };
        let commit_sha = client
            .create_commit(&options.repository, &new_commit)
            .await
            .map_err(step_err)?;

        client
            .update_ref(&options.repository, &options.branch, &commit_sha, false)
            .await
            .map_err(step_err)?;

        added += 1;
        emit(
            on_progress,
            SyncProgress::CommitReplayed {
                repository: batch.repository.clone(),
                hash: commit.hash.clone(),
            },
        );
    }

    Ok(added)
}
