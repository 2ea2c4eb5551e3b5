//! The sync command: pull commits from Bitbucket, replay them onto GitHub.
//!
//! Composes the library's two pipeline phases: the concurrent pull across
//! the workspace, then the strictly sequential push into the shadow
//! repository. Values come from flags, the layered config, and the bare
//! environment contract, in that order.

use std::sync::Arc;

use console::{Term, style};

use gitshadow::identity::parse_identity_list;
use gitshadow::sync::{
    DEFAULT_BRANCH, DEFAULT_SHADOW_REPOSITORY, PullFilters, PullReport, SyncOptions, pull_all,
    push_batches,
};
use gitshadow::{BitbucketClient, GitHubClient};

use crate::SyncArgs;
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Maximum number of fetch errors displayed in detail.
const MAX_DISPLAYED_ERRORS: usize = 10;

/// Everything the pipeline needs, resolved from flags, config and environment.
#[derive(Debug)]
struct Settings {
    workspace: String,
    bitbucket_username: String,
    bitbucket_password: String,
    emails: String,
    ignore: String,
    github_owner: String,
    github_token: String,
    author_name: String,
    author_email: String,
    repository: String,
    branch: String,
}

/// Resolve all required values, collecting the names of the missing ones.
///
/// Names follow the bare environment contract so the diagnostic points at
/// something the user can set directly.
fn resolve_settings(args: &SyncArgs, config: &Config) -> Result<Settings, Vec<&'static str>> {
    let mut missing = Vec::new();

    let mut require = |value: Option<String>, name: &'static str| match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    };

    let workspace = require(
        args.workspace.clone().or_else(|| config.bitbucket_workspace()),
        "BITBUCKET_WORKSPACE",
    );
    let bitbucket_username = require(config.bitbucket_username(), "BITBUCKET_USERNAME");
    let bitbucket_password = require(config.bitbucket_password(), "BITBUCKET_PASSWORD");
    let emails = require(
        args.emails.clone().or_else(|| config.bitbucket_emails()),
        "BITBUCKET_EMAIL",
    );
    let github_owner = require(config.github_owner(), "GITHUB_OWNER");
    let github_token = require(config.github_token(), "GITHUB_TOKEN");
    let author_name = require(config.github_username(), "GITHUB_USERNAME");
    let author_email = require(config.github_email(), "GITHUB_EMAIL");

    if !missing.is_empty() {
        return Err(missing);
    }

    let ignore = args
        .ignore
        .clone()
        .or_else(|| config.bitbucket_ignore_repos())
        .unwrap_or_default();
    let repository = args
        .repository
        .clone()
        .or_else(|| config.github_repository())
        .unwrap_or_else(|| DEFAULT_SHADOW_REPOSITORY.to_string());
    let branch = args
        .branch
        .clone()
        .or_else(|| config.github_branch())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

    Ok(Settings {
        workspace,
        bitbucket_username,
        bitbucket_password,
        emails,
        ignore,
        github_owner,
        github_token,
        author_name,
        author_email,
        repository,
        branch,
    })
}

/// Build the diagnostic for missing configuration values.
fn missing_values_message(missing: &[&'static str]) -> String {
    let hint = Config::default_config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "~/.config/gitshadow/config.toml".to_string());
    format!(
        "Missing required configuration: {}. Set them as environment variables (or in .env), or in {}",
        missing.join(", "),
        hint
    )
}

/// Handle the sync command.
pub(crate) async fn handle_sync(
    args: SyncArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match resolve_settings(&args, config) {
        Ok(settings) => settings,
        Err(missing) => return Err(missing_values_message(&missing).into()),
    };

    let filters = PullFilters::new(
        parse_identity_list(&settings.emails),
        parse_identity_list(&settings.ignore),
    );

    let bitbucket = BitbucketClient::new(
        &settings.workspace,
        &settings.bitbucket_username,
        &settings.bitbucket_password,
    )?;

    let is_tty = Term::stdout().is_term();
    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let pulled = pull_all(&bitbucket, &filters, Some(callback.as_ref())).await?;

    if pulled.batches.is_empty() {
        reporter.finish();
        display_fetch_errors(&pulled, is_tty);
        if is_tty {
            println!("No commits to sync.");
        } else {
            tracing::info!("No commits to sync");
        }
        return Ok(());
    }

    let github = GitHubClient::new(&settings.github_owner, &settings.github_token)?;
    let options = SyncOptions {
        repository: settings.repository.clone(),
        branch: settings.branch.clone(),
        author_name: settings.author_name.clone(),
        author_email: settings.author_email.clone(),
    };

    let report = push_batches(&github, &pulled.batches, &options, Some(callback.as_ref())).await?;

    reporter.finish();
    display_fetch_errors(&pulled, is_tty);

    if is_tty {
        println!(
            "\n{} Added {} commits across {} repositories to {}",
            style("✓").green(),
            report.total_added(),
            report.repositories.len(),
            settings.repository
        );
    } else {
        tracing::info!(
            added = report.total_added(),
            repositories = report.repositories.len(),
            repository = %settings.repository,
            "Sync finished"
        );
    }

    Ok(())
}

/// Display fetch failures so the user knows which repositories are absent.
///
/// The push still runs over every successfully fetched batch; these lines
/// explain what was left out.
fn display_fetch_errors(pulled: &PullReport, is_tty: bool) {
    if pulled.all_succeeded() {
        return;
    }

    let total_errors = pulled.errors.len();
    let display_count = std::cmp::min(MAX_DISPLAYED_ERRORS, total_errors);

    if is_tty {
        eprintln!(
            "\n{} {} repositories failed to fetch:",
            style("⚠").yellow(),
            total_errors
        );
        for error in pulled.errors.iter().take(display_count) {
            eprintln!("  - {}", error);
        }
        if total_errors > display_count {
            eprintln!("  ... and {} more errors", total_errors - display_count);
        }
    } else {
        for error in pulled.errors.iter().take(display_count) {
            tracing::error!(error = %error, "Repository fetch failed");
        }
        if total_errors > display_count {
            tracing::error!(
                additional_errors = total_errors - display_count,
                "Additional fetch errors occurred"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_none() -> SyncArgs {
        SyncArgs {
            workspace: None,
            repository: None,
            branch: None,
            emails: None,
            ignore: None,
        }
    }

    fn config_from(toml: &str) -> Config {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        settings.try_deserialize().unwrap()
    }

    const FULL_CONFIG: &str = r#"
        [bitbucket]
        workspace = "acme"
        username = "jane"
        password = "app-password"
        emails = "jane@work.example"

        [github]
        owner = "jane"
        token = "ghp_test123"
        username = "Jane Doe"
        email = "jane@work.example"
    "#;

    #[test]
    fn resolves_a_complete_configuration() {
        let config = config_from(FULL_CONFIG);

        let settings = resolve_settings(&args_none(), &config).expect("all values present");

        assert_eq!(settings.workspace, "acme");
        assert_eq!(settings.bitbucket_username, "jane");
        assert_eq!(settings.emails, "jane@work.example");
        assert_eq!(settings.github_owner, "jane");
        assert_eq!(settings.author_name, "Jane Doe");
        // Unset optionals get their defaults
        assert_eq!(settings.ignore, "");
        assert_eq!(settings.repository, DEFAULT_SHADOW_REPOSITORY);
        assert_eq!(settings.branch, DEFAULT_BRANCH);
    }

    #[test]
    fn flags_override_configured_values() {
        let config = config_from(FULL_CONFIG);
        let args = SyncArgs {
            workspace: Some("other-team".to_string()),
            repository: Some("MyShadow".to_string()),
            branch: Some("contributions".to_string()),
            emails: Some("jane@home.example".to_string()),
            ignore: Some("sandbox".to_string()),
        };

        let settings = resolve_settings(&args, &config).expect("all values present");

        assert_eq!(settings.workspace, "other-team");
        assert_eq!(settings.repository, "MyShadow");
        assert_eq!(settings.branch, "contributions");
        assert_eq!(settings.emails, "jane@home.example");
        assert_eq!(settings.ignore, "sandbox");
    }

    #[test]
    fn missing_source_values_are_reported_by_name() {
        // Note: accessors fall back to bare environment variables; this
        // test assumes no BITBUCKET_* variables are set in the test
        // environment.
        let config = config_from(
            r#"
            [github]
            owner = "jane"
            token = "ghp_test123"
            username = "Jane Doe"
            email = "jane@work.example"
        "#,
        );

        let missing = resolve_settings(&args_none(), &config).expect_err("source side is empty");

        assert!(missing.contains(&"BITBUCKET_WORKSPACE"));
        assert!(missing.contains(&"BITBUCKET_USERNAME"));
        assert!(missing.contains(&"BITBUCKET_PASSWORD"));
        assert!(missing.contains(&"BITBUCKET_EMAIL"));
    }

    #[test]
    fn empty_configured_values_count_as_missing() {
        let config = config_from(
            r#"
            [bitbucket]
            workspace = ""
            username = "jane"
            password = "app-password"
            emails = "jane@work.example"

            [github]
            owner = "jane"
            token = "ghp_test123"
            username = "Jane Doe"
            email = "jane@work.example"
        "#,
        );

        let missing = resolve_settings(&args_none(), &config).expect_err("workspace is empty");

        assert!(missing.contains(&"BITBUCKET_WORKSPACE"));
    }

    #[test]
    fn missing_values_message_names_every_value() {
        let message = missing_values_message(&["BITBUCKET_WORKSPACE", "GITHUB_TOKEN"]);

        assert!(message.starts_with("Missing required configuration"));
        assert!(message.contains("BITBUCKET_WORKSPACE"));
        assert!(message.contains("GITHUB_TOKEN"));
    }
}
