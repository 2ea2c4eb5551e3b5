//! Gitshadow CLI - mirrors Bitbucket commit activity onto GitHub.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitshadow")]
#[command(version)]
#[command(about = "Mirror Bitbucket commit activity onto GitHub")]
#[command(
    long_about = "Gitshadow pulls the commit history of every repository in a Bitbucket \
workspace, keeps the commits authored by you, and replays each new one as a \
date-stamped commit in a private GitHub shadow repository, so your GitHub \
contribution graph reflects work done on Bitbucket."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync every repository in the configured workspace:
        $ gitshadow sync

    Sync a different workspace, skipping two repositories:
        $ gitshadow sync --workspace acme --ignore "legacy-api playground"

    Mirror commits made under several identities:
        $ gitshadow sync --emails "jane@work.example jane@home.example"

    Generate shell completions:
        $ gitshadow completions bash > ~/.local/share/bash-completion/completions/gitshadow

CONFIGURATION
    Gitshadow reads configuration from:
      1. Command-line flags
      2. Environment variables (GITSHADOW_* prefix, e.g., GITSHADOW_GITHUB_TOKEN)
      3. ~/.config/gitshadow/config.toml (or $XDG_CONFIG_HOME/gitshadow/config.toml)
      4. ./gitshadow.toml
      5. .env file in the current directory (bare variable names below)

ENVIRONMENT VARIABLES
    BITBUCKET_WORKSPACE       Bitbucket workspace to pull from
    BITBUCKET_USERNAME        Bitbucket username
    BITBUCKET_PASSWORD        Bitbucket app password
    BITBUCKET_EMAIL           Space-separated commit author emails to mirror
    BITBUCKET_IGNORE_REPOS    Space-separated repository slugs to skip
    GITHUB_OWNER              GitHub account the shadow repository lives under
    GITHUB_TOKEN              GitHub personal access token
    GITHUB_USERNAME           Author name stamped on replayed commits
    GITHUB_EMAIL              Author email stamped on replayed commits
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull commits from Bitbucket and replay them onto GitHub
    Sync {
        #[command(flatten)]
        args: SyncArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Flags for the sync pipeline. Unset values fall back to config and
/// environment variables.
#[derive(Debug, Clone, clap::Args)]
struct SyncArgs {
    /// Bitbucket workspace to pull from
    #[arg(short = 'w', long)]
    workspace: Option<String>,

    /// Shadow repository name on GitHub (default: BitbucketCommitsShadowContributions)
    #[arg(short = 'r', long)]
    repository: Option<String>,

    /// Branch the replayed commits advance (default: main)
    #[arg(short = 'b', long)]
    branch: Option<String>,

    /// Space-separated commit author emails to mirror
    #[arg(short = 'e', long)]
    emails: Option<String>,

    /// Space-separated repository slugs to skip
    #[arg(short = 'i', long)]
    ignore: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    // Only initialize if not connected to a TTY
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("gitshadow=info,gitshadow_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (flags are applied on top by the sync command)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { args } => {
            commands::sync::handle_sync(args, &config).await?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
        }
    }

    Ok(())
}
