//! GitHub API client for git object-graph operations.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::GitHubError;
use super::types::{Blob, HeadCommit, NewBlob, NewCommit, NewRepository, NewTree, NewTreeEntry, RefUpdate, Tree};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Default GitHub API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Response shell for object-creation endpoints; only the sha is used.
#[derive(Debug, serde::Deserialize)]
struct ObjectSha {
    sha: String,
}

/// GitHub API client, scoped to one repository owner.
///
/// Exposes the low-level git database operations (blobs, trees, commits,
/// refs) plus repository existence and creation. Each call maps to exactly
/// one request; failures are typed, never retried.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    owner: String,
    authorization: String,
}

impl GitHubClient {
    /// Create a new client for repositories owned by `owner`.
    ///
    /// # Arguments
    ///
    /// * `owner` - Account that owns the repositories being written to
    /// * `token` - Personal access token for that account
    pub fn new(owner: &str, token: &str) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))?;
        Ok(Self::with_transport(
            Arc::new(transport),
            GITHUB_API_URL,
            owner,
            token,
        ))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        api_url: &str,
        owner: &str,
        token: &str,
    ) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            authorization: format!("Bearer {token}"),
        }
    }

    /// The account this client writes to.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Accept".to_string(),
                "application/vnd.github.v3+json".to_string(),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), "gitshadow".to_string()),
            ("Authorization".to_string(), self.authorization.clone()),
        ]
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, GitHubError> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.api_url, path),
            headers: self.headers(),
            body,
        };
        Ok(self.transport.send(request).await?)
    }

    fn ensure_success(response: &HttpResponse) -> Result<(), GitHubError> {
        if !(200..300).contains(&response.status) {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(GitHubError::Api {
                status: response.status,
                message,
            });
        }
        Ok(())
    }

    /// Make an authenticated GET request and parse the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitHubError> {
        let response = self.request(HttpMethod::Get, path, Vec::new()).await?;
        Self::ensure_success(&response)?;
        serde_json::from_slice(&response.body).map_err(GitHubError::Json)
    }

    /// Make an authenticated request with a JSON body and parse the response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, GitHubError> {
        let body = serde_json::to_vec(payload)?;
        let response = self.request(method, path, body).await?;
        Self::ensure_success(&response)?;
        serde_json::from_slice(&response.body).map_err(GitHubError::Json)
    }

    /// Check whether a repository exists under the configured owner.
    ///
    /// A 404 is an answer here, not an error; any other failing status
    /// still surfaces as [`GitHubError::Api`].
    pub async fn repository_exists(&self, repository: &str) -> Result<bool, GitHubError> {
        let path = format!("/repos/{}/{}", self.owner, repository);
        let response = self.request(HttpMethod::Get, &path, Vec::new()).await?;

        match response.status {
            s if (200..300).contains(&s) => Ok(true),
            404 => Ok(false),
            status => Err(GitHubError::Api {
                status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }),
        }
    }

    /// Create a repository under the authenticated user.
    pub async fn create_repository(&self, repository: &NewRepository) -> Result<(), GitHubError> {
        let body = serde_json::to_vec(repository)?;
        let response = self.request(HttpMethod::Post, "/user/repos", body).await?;
        Self::ensure_success(&response)
    }

    /// Fetch a blob by sha.
    pub async fn blob(&self, repository: &str, sha: &str) -> Result<Blob, GitHubError> {
        self.get(&format!(
            "/repos/{}/{}/git/blobs/{}",
            self.owner, repository, sha
        ))
        .await
    }

    /// Write a blob and return its sha.
    pub async fn create_blob(
        &self,
        repository: &str,
        blob: &NewBlob,
    ) -> Result<String, GitHubError> {
        let created: ObjectSha = self
            .send_json(
                HttpMethod::Post,
                &format!("/repos/{}/{}/git/blobs", self.owner, repository),
                blob,
            )
            .await?;
        Ok(created.sha)
    }

    /// Fetch a tree listing by sha.
    pub async fn tree(&self, repository: &str, sha: &str) -> Result<Tree, GitHubError> {
        self.get(&format!(
            "/repos/{}/{}/git/trees/{}",
            self.owner, repository, sha
        ))
        .await
    }

    /// Create a tree from `entries`, layered on `base_tree` when given,
    /// and return the new tree's sha.
    pub async fn create_tree(
        &self,
        repository: &str,
        entries: Vec<NewTreeEntry>,
        base_tree: Option<&str>,
    ) -> Result<String, GitHubError> {
        let payload = NewTree {
            tree: entries,
            base_tree: base_tree.map(str::to_string),
        };
        let created: ObjectSha = self
            .send_json(
                HttpMethod::Post,
                &format!("/repos/{}/{}/git/trees", self.owner, repository),
                &payload,
            )
            .await?;
        Ok(created.sha)
    }

    /// Fetch the commit a branch currently points at, with its tree sha.
    pub async fn latest_commit(
        &self,
        repository: &str,
        reference: &str,
    ) -> Result<HeadCommit, GitHubError> {
        self.get(&format!(
            "/repos/{}/{}/commits/{}",
            self.owner, repository, reference
        ))
        .await
    }

    /// Create a commit object and return its sha.
    pub async fn create_commit(
        &self,
        repository: &str,
        commit: &NewCommit,
    ) -> Result<String, GitHubError> {
        let created: ObjectSha = self
            .send_json(
                HttpMethod::Post,
                &format!("/repos/{}/{}/git/commits", self.owner, repository),
                commit,
            )
            .await?;
        Ok(created.sha)
    }

    /// Point `branch` at `sha`.
    pub async fn update_ref(
        &self,
        repository: &str,
        branch: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), GitHubError> {
        let payload = RefUpdate {
            sha: sha.to_string(),
            force,
        };
        let body = serde_json::to_vec(&payload)?;
        let response = self
            .request(
                HttpMethod::Patch,
                &format!("/repos/{}/{}/git/refs/heads/{}", self.owner, repository, branch),
                body,
            )
            .await?;
        Self::ensure_success(&response)
    }
}
