//! Bitbucket API client creation and paginated listings.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::error::BitbucketError;
use super::types::{CommitEntry, Page, RepositorySummary};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::identity::CommitFilter;
use crate::sync::CommitRecord;

/// Default Bitbucket Cloud API base URL.
pub const BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Field projections keep page payloads down to what the pipeline reads.
const REPOSITORY_FIELDS: &str = "fields=next,values.slug";
const COMMIT_FIELDS: &str = "fields=next,values.author,values.date,values.hash";

/// Bitbucket Cloud API client, scoped to one workspace.
///
/// Authentication uses HTTP Basic with a username and app password; the
/// header value is computed once at construction and reused for every
/// request, so per-call state never mutates the client.
#[derive(Clone)]
pub struct BitbucketClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    workspace: String,
    authorization: String,
}

impl BitbucketClient {
    /// Create a new client for `workspace`.
    ///
    /// # Arguments
    ///
    /// * `workspace` - Bitbucket workspace the listings are scoped to
    /// * `username` - Bitbucket username
    /// * `password` - App password for that user
    pub fn new(workspace: &str, username: &str, password: &str) -> Result<Self, BitbucketError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))?;
        Ok(Self::with_transport(
            Arc::new(transport),
            BITBUCKET_API_URL,
            workspace,
            username,
            password,
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        api_url: &str,
        workspace: &str,
        username: &str,
        password: &str,
    ) -> Self {
        let credentials = BASE64.encode(format!("{username}:{password}"));
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            workspace: workspace.to_string(),
            authorization: format!("Basic {credentials}"),
        }
    }

    /// The workspace this client is scoped to.
    #[must_use]
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Make an authenticated GET request against a fully formed URL.
    ///
    /// Pagination follows server-provided `next` URLs, so unlike a
    /// path-based helper this one takes the URL verbatim.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BitbucketError> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "gitshadow".to_string()),
                ("Authorization".to_string(), self.authorization.clone()),
            ],
            body: Vec::new(),
        };

        let response = self.transport.send(request).await?;

        if !(200..300).contains(&response.status) {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(BitbucketError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_slice(&response.body).map_err(BitbucketError::Json)
    }

    /// List all repository slugs in the workspace, in response order.
    ///
    /// Follows cursor pagination until the last page. A failing page with
    /// nothing accumulated fails the listing; once at least one slug has
    /// been collected, a failing page only ends the listing early and the
    /// partial result is returned as a success. Pages are never retried.
    pub async fn list_repositories(&self) -> Result<Vec<String>, BitbucketError> {
        let mut slugs = Vec::new();
        let mut url = format!(
            "{}/repositories/{}?{}",
            self.api_url, self.workspace, REPOSITORY_FIELDS
        );

        loop {
            let page: Page<RepositorySummary> = match self.get(&url).await {
                Ok(page) => page,
                Err(err) if !slugs.is_empty() => {
                    tracing::warn!(
                        workspace = %self.workspace,
                        accumulated = slugs.len(),
                        error = %err,
                        "repository page failed, returning partial listing"
                    );
                    return Ok(slugs);
                }
                Err(err) => return Err(err),
            };

            slugs.extend(page.values.iter().map(|repo| repo.slug.clone()));

            match page.next_url() {
                Some(next) => url = next,
                None => break,
            }
        }

        tracing::debug!(workspace = %self.workspace, total = slugs.len(), "listed repositories");
        Ok(slugs)
    }

    /// Fetch the commits of `repository` whose author matches `filter`.
    ///
    /// Commits are filtered during pagination, so the partial-failure rule
    /// counts qualifying commits: a page failure with none accumulated is
    /// a fetch failure (distinct from an empty result), while a failure
    /// after the first qualifying commit degrades to a partial success and
    /// later pages are not attempted.
    pub async fn list_commits(
        &self,
        repository: &str,
        filter: &CommitFilter,
    ) -> Result<Vec<CommitRecord>, BitbucketError> {
        let mut commits = Vec::new();
        let mut url = format!(
            "{}/repositories/{}/{}/commits/?{}",
            self.api_url, self.workspace, repository, COMMIT_FIELDS
        );

        loop {
            let page: Page<CommitEntry> = match self.get(&url).await {
                Ok(page) => page,
                Err(err) if !commits.is_empty() => {
                    tracing::warn!(
                        repository,
                        accumulated = commits.len(),
                        error = %err,
                        "commit page failed, returning partial listing"
                    );
                    return Ok(commits);
                }
                Err(err) => return Err(err),
            };

            for entry in page.values.iter() {
                if let Some(author_email) = filter.matches(&entry.author.raw) {
                    commits.push(CommitRecord {
                        hash: entry.hash.clone(),
                        date: entry.date,
                        author_email,
                    });
                }
            }

            match page.next_url() {
                Some(next) => url = next,
                None => break,
            }
        }

        tracing::debug!(repository, matched = commits.len(), "fetched commits");
        Ok(commits)
    }
}
