//! GitHub git object-graph data types.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::error::GitHubError;

/// Payload for creating a repository under the authenticated user.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

/// A git blob as returned by the object database.
///
/// The API delivers blob content base64-encoded, wrapped with newlines
/// every 60 characters.
#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    pub content: String,
    pub encoding: String,
}

impl Blob {
    /// Decode the blob payload to UTF-8 text.
    pub fn decode(&self) -> Result<String, GitHubError> {
        if self.encoding != "base64" {
            return Err(GitHubError::Content(format!(
                "unsupported blob encoding: {}",
                self.encoding
            )));
        }

        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| GitHubError::Content(format!("invalid base64 payload: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| GitHubError::Content(format!("blob is not valid UTF-8: {e}")))
    }
}

/// Payload for writing a text blob into the object database.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: String,
}

impl NewBlob {
    /// Encode UTF-8 text as a base64 blob payload.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            content: BASE64.encode(text.as_bytes()),
            encoding: "base64".to_string(),
        }
    }
}

/// A git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub sha: String,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

impl Tree {
    /// Find the blob sha of the entry at `path`, if present.
    #[must_use]
    pub fn entry_sha(&self, path: &str) -> Option<&str> {
        self.tree
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.sha.as_str())
    }
}

/// One entry in a git tree.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

/// One entry in a tree-creation payload, carrying inline content.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl NewTreeEntry {
    /// A regular file entry with inline text content.
    #[must_use]
    pub fn file(path: &str, content: &str) -> Self {
        Self {
            path: path.to_string(),
            mode: "100644".to_string(),
            kind: "blob".to_string(),
            content: content.to_string(),
        }
    }
}

/// Payload for creating a tree, optionally layered on a base tree.
///
/// With `base_tree` set the server merges the new entries over the base
/// instead of replacing the whole listing.
#[derive(Debug, Clone, Serialize)]
pub struct NewTree {
    pub tree: Vec<NewTreeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<String>,
}

/// Author identity and timestamp recorded on a created commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
    /// Serialized as RFC 3339, preserving the source offset.
    pub date: DateTime<FixedOffset>,
}

/// Payload for creating a commit object.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
    pub author: CommitSignature,
}

/// Payload for moving a ref to a new commit.
#[derive(Debug, Clone, Serialize)]
pub struct RefUpdate {
    pub sha: String,
    pub force: bool,
}

/// The commit a branch ref currently points at.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    pub sha: String,
    pub commit: CommitInfo,
}

/// Nested commit payload of a head-commit response.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub tree: TreeRef,
}

/// A bare reference to a tree object.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeRef {
    pub sha: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_decode_handles_plain_base64() {
        let blob = Blob {
            content: "aGVsbG8gd29ybGQ=".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(blob.decode().expect("decode"), "hello world");
    }

    #[test]
    fn blob_decode_strips_newline_wrapping() {
        let blob = Blob {
            content: "aGVsbG8g\nd29ybGQ=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(blob.decode().expect("decode"), "hello world");
    }

    #[test]
    fn blob_decode_rejects_unknown_encoding() {
        let blob = Blob {
            content: "hello".to_string(),
            encoding: "utf-8".to_string(),
        };
        let err = blob.decode().expect_err("should reject");
        assert!(matches!(err, GitHubError::Content(_)));
    }

    #[test]
    fn blob_decode_rejects_invalid_base64() {
        let blob = Blob {
            content: "!!not-base64!!".to_string(),
            encoding: "base64".to_string(),
        };
        let err = blob.decode().expect_err("should reject");
        assert!(matches!(err, GitHubError::Content(_)));
    }

    #[test]
    fn new_blob_round_trips_through_decode() {
        let payload = NewBlob::from_text("commit-hash-1\ncommit-hash-2");
        assert_eq!(payload.encoding, "base64");

        let blob = Blob {
            content: payload.content,
            encoding: payload.encoding,
        };
        assert_eq!(blob.decode().expect("decode"), "commit-hash-1\ncommit-hash-2");
    }

    #[test]
    fn new_tree_entry_file_uses_regular_blob_mode() {
        let entry = NewTreeEntry::file("ledger.txt", "abc");
        assert_eq!(entry.mode, "100644");
        assert_eq!(entry.kind, "blob");

        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["type"], "blob");
        assert_eq!(json["path"], "ledger.txt");
    }

    #[test]
    fn new_tree_omits_base_tree_when_absent() {
        let without = NewTree {
            tree: vec![NewTreeEntry::file("a", "x")],
            base_tree: None,
        };
        let json = serde_json::to_value(&without).expect("serialize");
        assert!(json.get("base_tree").is_none());

        let with = NewTree {
            tree: vec![NewTreeEntry::file("a", "x")],
            base_tree: Some("basesha".to_string()),
        };
        let json = serde_json::to_value(&with).expect("serialize");
        assert_eq!(json["base_tree"], "basesha");
    }

    #[test]
    fn new_commit_serializes_author_date_as_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2021-03-09T08:41:43+05:30").expect("parse");
        let commit = NewCommit {
            message: "Update ledger.txt".to_string(),
            tree: "treesha".to_string(),
            parents: vec!["parentsha".to_string()],
            author: CommitSignature {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                date,
            },
        };

        let json = serde_json::to_value(&commit).expect("serialize");
        assert_eq!(json["author"]["date"], "2021-03-09T08:41:43+05:30");
        assert_eq!(json["parents"][0], "parentsha");
    }

    #[test]
    fn head_commit_parses_sha_and_tree() {
        let body = r#"{
            "sha": "headsha",
            "commit": {"tree": {"sha": "treesha"}},
            "extra": "ignored"
        }"#;
        let head: HeadCommit = serde_json::from_str(body).expect("parse");
        assert_eq!(head.sha, "headsha");
        assert_eq!(head.commit.tree.sha, "treesha");
    }

    #[test]
    fn tree_entry_sha_finds_path() {
        let body = r#"{
            "sha": "treesha",
            "tree": [
                {"path": "README.md", "mode": "100644", "type": "blob", "sha": "readme-sha"},
                {"path": "ledger.txt", "mode": "100644", "type": "blob", "sha": "ledger-sha"}
            ]
        }"#;
        let tree: Tree = serde_json::from_str(body).expect("parse");
        assert_eq!(tree.entry_sha("ledger.txt"), Some("ledger-sha"));
        assert_eq!(tree.entry_sha("missing.txt"), None);
    }
}
