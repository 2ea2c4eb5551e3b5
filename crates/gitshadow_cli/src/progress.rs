//! Progress reporting for sync operations.
//!
//! This module provides two modes of progress reporting:
//! - Interactive mode (TTY): Animated progress bars using indicatif
//! - Logging mode (non-TTY): Structured logging using tracing
//!
//! Progress bars are organized as:
//! - List bar: Spinner while the workspace listing runs
//! - Fetch bar: One tick per repository in the commit fan-out
//! - Push bar: One tick per replayed repository batch

use std::sync::{Arc, Mutex};

use console::Term;
use gitshadow::sync::{ProgressCallback, SyncProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Create an interactive reporter (for testing or forcing TTY mode).
    #[allow(dead_code)]
    pub fn interactive() -> Self {
        Self::Interactive(InteractiveReporter::new())
    }

    /// Create a logging reporter (for testing or forcing non-TTY mode).
    #[allow(dead_code)]
    pub fn logging() -> Self {
        Self::Logging(LoggingReporter::new())
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> Arc<ProgressCallback> {
        let reporter = Arc::clone(self);
        Arc::new(Box::new(move |event| {
            reporter.handle(event);
        }))
    }

    /// Finish all progress bars (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Consolidated progress state under a single lock.
#[derive(Default)]
struct ProgressState {
    /// Spinner for the workspace listing.
    list_bar: Option<ProgressBar>,
    /// Bar ticking once per repository in the fetch fan-out.
    fetch_bar: Option<ProgressBar>,
    /// Bar ticking once per replayed repository batch.
    push_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
///
/// All mutable state is consolidated into a single `Mutex<ProgressState>`
/// to ensure consistent updates and avoid lock ordering issues.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    /// Create a new interactive reporter.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap();

        match event {
            SyncProgress::ListingRepositories { workspace } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "Listing"));
                pb.set_message(format!("Repositories in {}...", workspace));
                state.list_bar = Some(pb);
            }

            SyncProgress::RepositoriesListed { total, .. } => {
                if let Some(ref pb) = state.list_bar {
                    pb.finish_with_message(format!("✓ {} repositories", total));
                }
            }

            SyncProgress::FetchingCommits { repositories } => {
                let pb = self.multi.add(ProgressBar::new(repositories as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Fetching"));
                pb.set_message("Fetching commits...");
                state.fetch_bar = Some(pb);
            }

            SyncProgress::RepositoryIgnored { repository } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.inc(1);
                    pb.set_message(format!("· {} (ignored)", repository));
                }
            }

            SyncProgress::RepositoryFetched {
                repository,
                commits,
            } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.inc(1);
                    pb.set_message(format!("✓ {} ({} commits)", repository, commits));
                }
            }

            SyncProgress::RepositoryEmpty { repository } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.inc(1);
                    pb.set_message(format!("· {} (no matching commits)", repository));
                }
            }

            SyncProgress::RepositoryFetchFailed { repository, error } => {
                if let Some(ref pb) = state.fetch_bar {
                    pb.inc(1);
                    pb.set_message(format!("✗ {}: {}", repository, error));
                }
            }

            SyncProgress::FetchCompleted {
                fetched,
                skipped,
                failed,
                ..
            } => {
                if let Some(ref pb) = state.fetch_bar {
                    let msg = if failed > 0 {
                        format!(
                            "✓ {} fetched, {} ignored, {} failed",
                            fetched, skipped, failed
                        )
                    } else {
                        format!("✓ {} fetched, {} ignored", fetched, skipped)
                    };
                    pb.finish_with_message(msg);
                }
            }

            SyncProgress::CreatingShadowRepository { repository } => {
                // Release lock before printing to avoid holding it during I/O
                drop(state);
                self.multi
                    .println(format!("Creating shadow repository {}...", repository))
                    .ok();
            }

            SyncProgress::SyncingRepository {
                total, repository, ..
            } => {
                if state.push_bar.is_none() {
                    let pb = self.multi.add(ProgressBar::new(total as u64));
                    pb.set_style(Self::bar_style());
                    pb.set_prefix(format!("{:12}", "Pushing"));
                    state.push_bar = Some(pb);
                }
                if let Some(ref pb) = state.push_bar {
                    pb.set_message(format!("{}...", repository));
                }
            }

            SyncProgress::CommitReplayed { repository, hash } => {
                if let Some(ref pb) = state.push_bar {
                    let short: String = hash.chars().take(8).collect();
                    pb.set_message(format!("{}: {}", repository, short));
                }
            }

            SyncProgress::RepositorySynced { repository, added } => {
                if let Some(ref pb) = state.push_bar {
                    pb.inc(1);
                    pb.set_message(format!("✓ {} (+{})", repository, added));
                }
            }

            SyncProgress::PushCompleted {
                repositories,
                commits,
            } => {
                if let Some(ref pb) = state.push_bar {
                    pb.finish_with_message(format!(
                        "✓ {} commits across {} repositories",
                        commits, repositories
                    ));
                }
            }

            _ => {}
        }
    }

    /// Finish all progress bars.
    pub fn finish(&self) {
        let state = self.state.lock().unwrap();
        if let Some(ref pb) = state.list_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
        if let Some(ref pb) = state.fetch_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
        if let Some(ref pb) = state.push_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    /// Create a new logging reporter.
    pub fn new() -> Self {
        Self
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::ListingRepositories { workspace } => {
                tracing::info!(workspace = %workspace, "Listing repositories");
            }

            SyncProgress::RepositoriesListed { workspace, total } => {
                tracing::info!(workspace = %workspace, total, "Repositories listed");
            }

            SyncProgress::FetchingCommits { repositories } => {
                tracing::info!(repositories, "Fetching commits");
            }

            SyncProgress::RepositoryIgnored { repository } => {
                tracing::debug!(repository = %repository, "Skipped (ignore list)");
            }

            SyncProgress::RepositoryFetched {
                repository,
                commits,
            } => {
                tracing::info!(repository = %repository, commits, "Fetched commits");
            }

            SyncProgress::RepositoryEmpty { repository } => {
                tracing::debug!(repository = %repository, "No matching commits");
            }

            SyncProgress::RepositoryFetchFailed { repository, error } => {
                tracing::warn!(repository = %repository, error = %error, "Fetch failed");
            }

            SyncProgress::FetchCompleted {
                fetched,
                empty,
                skipped,
                failed,
            } => {
                tracing::info!(fetched, empty, skipped, failed, "Fetch complete");
            }

            SyncProgress::CreatingShadowRepository { repository } => {
                tracing::info!(repository = %repository, "Creating shadow repository");
            }

            SyncProgress::SyncingRepository {
                index,
                total,
                repository,
            } => {
                tracing::info!(index, total, repository = %repository, "Syncing repository");
            }

            SyncProgress::CommitReplayed { repository, hash } => {
                tracing::debug!(repository = %repository, hash = %hash, "Replayed commit");
            }

            SyncProgress::RepositorySynced { repository, added } => {
                tracing::info!(repository = %repository, added, "Repository synced");
            }

            SyncProgress::PushCompleted {
                repositories,
                commits,
            } => {
                tracing::info!(repositories, commits, "Push complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
