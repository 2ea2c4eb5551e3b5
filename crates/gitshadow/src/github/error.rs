use thiserror::Error;

use crate::http::HttpError;

/// Errors from GitHub API operations.
///
/// Object-graph writes are never retried; every failure surfaces as one of
/// these typed variants and the caller decides whether it is fatal.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// JSON body failed to serialize or parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API returned a non-success status.
    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A blob payload could not be decoded to text.
    #[error("blob content error: {0}")]
    Content(String),
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &GitHubError) -> String {
    match err {
        GitHubError::Http(_) => "Network error".to_string(),
        GitHubError::Json(_) => "JSON parse error".to_string(),
        GitHubError::Content(_) => "Blob decode error".to_string(),
        GitHubError::Api { status, message } => {
            if message.len() > 50 {
                // Use chars to avoid panicking on multi-byte UTF-8
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
    }
}
