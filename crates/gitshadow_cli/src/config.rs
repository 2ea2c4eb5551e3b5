//! Configuration file support for gitshadow.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `GITSHADOW_`, e.g., `GITSHADOW_GITHUB_TOKEN`)
//! 3. Config file (~/.config/gitshadow/config.toml, then ./gitshadow.toml)
//! 4. Bare environment variables (the `.env` contract, e.g., `BITBUCKET_USERNAME`)
//!
//! Example config file:
//! ```toml
//! [bitbucket]
//! workspace = "my-team"
//! username = "jane"
//! password = "app-password"    # or use BITBUCKET_PASSWORD env var
//! emails = '"jane@work.example" "jane@home.example"'
//! ignore_repos = "sandbox playground"
//!
//! [github]
//! owner = "jane"
//! token = "ghp_..."            # or use GITHUB_TOKEN env var
//! username = "Jane Doe"
//! email = "jane@work.example"
//! repository = "BitbucketCommitsShadowContributions"  # optional, this is the default
//! branch = "main"                                     # optional, this is the default
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bitbucket (source) configuration.
    pub bitbucket: BitbucketConfig,
    /// GitHub (destination) configuration.
    pub github: GitHubConfig,
}

/// Bitbucket source configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BitbucketConfig {
    /// Workspace the repository listings are scoped to.
    /// Can also be set via BITBUCKET_WORKSPACE environment variable.
    pub workspace: Option<String>,
    /// Bitbucket username.
    /// Can also be set via BITBUCKET_USERNAME environment variable.
    pub username: Option<String>,
    /// Bitbucket app password.
    /// Can also be set via BITBUCKET_PASSWORD environment variable.
    pub password: Option<String>,
    /// Space-separated commit author emails to mirror.
    /// Can also be set via BITBUCKET_EMAIL environment variable.
    pub emails: Option<String>,
    /// Space-separated repository slugs to skip.
    /// Can also be set via BITBUCKET_IGNORE_REPOS environment variable.
    pub ignore_repos: Option<String>,
}

/// GitHub destination configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Account the shadow repository lives under.
    /// Can also be set via GITHUB_OWNER environment variable.
    pub owner: Option<String>,
    /// GitHub personal access token.
    /// Can also be set via GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// Author name stamped on replayed commits.
    /// Can also be set via GITHUB_USERNAME environment variable.
    pub username: Option<String>,
    /// Author email stamped on replayed commits.
    /// Can also be set via GITHUB_EMAIL environment variable.
    pub email: Option<String>,
    /// Shadow repository name. Defaults to the library's
    /// `DEFAULT_SHADOW_REPOSITORY` when unset.
    pub repository: Option<String>,
    /// Branch the replayed commits advance. Defaults to the library's
    /// `DEFAULT_BRANCH` when unset.
    pub branch: Option<String>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Local config file (./gitshadow.toml)
    /// 2. XDG config file (~/.config/gitshadow/config.toml)
    /// 3. Environment variables with GITSHADOW_ prefix
    ///
    /// The bare environment variables from the `.env` contract are applied
    /// as fallbacks by the accessors, not here.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        // Add local config file if it exists
        let local_config = PathBuf::from("gitshadow.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./gitshadow.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // Add XDG config file (higher priority than local)
        if let Some(proj_dirs) = ProjectDirs::from("", "", "gitshadow") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Add GITSHADOW_ prefixed environment variables
        // e.g., GITSHADOW_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("GITSHADOW")
                .separator("_")
                .try_parsing(true),
        );

        // Build the config and deserialize
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the Bitbucket workspace.
    pub fn bitbucket_workspace(&self) -> Option<String> {
        self.bitbucket
            .workspace
            .clone()
            .or_else(|| env_non_empty("BITBUCKET_WORKSPACE"))
    }

    /// Get the Bitbucket username.
    pub fn bitbucket_username(&self) -> Option<String> {
        self.bitbucket
            .username
            .clone()
            .or_else(|| env_non_empty("BITBUCKET_USERNAME"))
    }

    /// Get the Bitbucket app password.
    pub fn bitbucket_password(&self) -> Option<String> {
        self.bitbucket
            .password
            .clone()
            .or_else(|| env_non_empty("BITBUCKET_PASSWORD"))
    }

    /// Get the space-separated author email list.
    pub fn bitbucket_emails(&self) -> Option<String> {
        self.bitbucket
            .emails
            .clone()
            .or_else(|| env_non_empty("BITBUCKET_EMAIL"))
    }

    /// Get the space-separated ignore list.
    pub fn bitbucket_ignore_repos(&self) -> Option<String> {
        self.bitbucket
            .ignore_repos
            .clone()
            .or_else(|| env_non_empty("BITBUCKET_IGNORE_REPOS"))
    }

    /// Get the GitHub account owner.
    pub fn github_owner(&self) -> Option<String> {
        self.github
            .owner
            .clone()
            .or_else(|| env_non_empty("GITHUB_OWNER"))
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| env_non_empty("GITHUB_TOKEN"))
    }

    /// Get the author name for replayed commits.
    pub fn github_username(&self) -> Option<String> {
        self.github
            .username
            .clone()
            .or_else(|| env_non_empty("GITHUB_USERNAME"))
    }

    /// Get the author email for replayed commits.
    pub fn github_email(&self) -> Option<String> {
        self.github
            .email
            .clone()
            .or_else(|| env_non_empty("GITHUB_EMAIL"))
    }

    /// Get the configured shadow repository name, if any.
    pub fn github_repository(&self) -> Option<String> {
        self.github.repository.clone()
    }

    /// Get the configured branch, if any.
    pub fn github_branch(&self) -> Option<String> {
        self.github.branch.clone()
    }

    /// Get the default config file path, for diagnostics.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitshadow").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Read an environment variable, treating an empty value as unset.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
