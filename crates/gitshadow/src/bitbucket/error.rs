//! Error types for Bitbucket API operations.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when interacting with the Bitbucket API.
///
/// A value of this type describes one failed page request. Whether that
/// failure aborts a listing or degrades it to a partial result is decided
/// by the pagination loop, based on what was accumulated before it.
#[derive(Debug, Error)]
pub enum BitbucketError {
    /// Transport-level failure, already normalized by the HTTP gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &BitbucketError) -> String {
    match err {
        BitbucketError::Http(_) => "Network error".to_string(),
        BitbucketError::Json(_) => "JSON parse error".to_string(),
        BitbucketError::Api { status, message } => {
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
