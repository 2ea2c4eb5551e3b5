//! Bitbucket API data types.
//!
//! Only the fields the pipeline requests via the `fields` query
//! projection are modeled; everything else in the response is ignored.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// One page of a cursor-paginated listing.
///
/// Every Bitbucket collection endpoint returns its items under `values`
/// together with an optional `next` URL; the last page omits `next`.
///
/// API docs: https://developer.atlassian.com/cloud/bitbucket/rest/intro/#pagination
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Items of this page, in response order.
    #[serde(default)]
    pub values: Vec<T>,
    /// Fetch URL of the next page; absent (or empty) on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// The next-page URL, treating an empty string as end of listing.
    #[must_use]
    pub fn next_url(self) -> Option<String> {
        self.next.filter(|url| !url.is_empty())
    }
}

/// Repository summary from the workspace listing.
///
/// API docs: https://developer.atlassian.com/cloud/bitbucket/rest/api-group-repositories/#api-repositories-workspace-get
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositorySummary {
    /// URL-safe repository identifier; also used as the shadow file path.
    pub slug: String,
}

/// Commit author as reported by the commits endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    /// Free-text author string, conventionally `Name <email>`.
    #[serde(default)]
    pub raw: String,
}

/// One commit from the commits listing.
///
/// API docs: https://developer.atlassian.com/cloud/bitbucket/rest/api-group-commits/
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitEntry {
    /// Full commit hash.
    pub hash: String,
    /// Author date with the source's UTC offset preserved.
    pub date: DateTime<FixedOffset>,
    /// Author field; commits with no author fall back to an empty raw string.
    #[serde(default)]
    pub author: CommitAuthor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_deserializes_values_and_next() {
        let json = r#"{
            "values": [{"slug": "api"}, {"slug": "frontend"}],
            "next": "https://api.bitbucket.org/2.0/repositories/acme?page=2"
        }"#;

        let page: Page<RepositorySummary> = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[0].slug, "api");
        assert_eq!(
            page.next_url().as_deref(),
            Some("https://api.bitbucket.org/2.0/repositories/acme?page=2")
        );
    }

    #[test]
    fn page_without_next_terminates_listing() {
        let json = r#"{"values": [{"slug": "api"}]}"#;
        let page: Page<RepositorySummary> = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.next_url(), None);
    }

    #[test]
    fn page_with_empty_next_terminates_listing() {
        let json = r#"{"values": [], "next": ""}"#;
        let page: Page<RepositorySummary> = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.next_url(), None);
    }

    #[test]
    fn commit_entry_parses_hash_date_and_author() {
        let json = r#"{
            "hash": "f1e2d3c4b5a69788f1e2d3c4b5a69788f1e2d3c4",
            "date": "2021-03-09T08:41:43+00:00",
            "author": {"raw": "Jane Doe <jane@x.com>"}
        }"#;

        let entry: CommitEntry = serde_json::from_str(json).expect("valid commit");
        assert_eq!(entry.hash, "f1e2d3c4b5a69788f1e2d3c4b5a69788f1e2d3c4");
        assert_eq!(entry.author.raw, "Jane Doe <jane@x.com>");
        assert_eq!(entry.date.to_rfc3339(), "2021-03-09T08:41:43+00:00");
    }

    #[test]
    fn commit_entry_defaults_missing_author_to_empty_raw() {
        let json = r#"{"hash": "abc123", "date": "2021-03-09T08:41:43+02:00"}"#;
        let entry: CommitEntry = serde_json::from_str(json).expect("valid commit");
        assert_eq!(entry.author.raw, "");
    }
}
