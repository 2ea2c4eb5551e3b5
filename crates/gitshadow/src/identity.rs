//! Author identity extraction and filtering.
//!
//! The source host reports commit authors as free text in the common
//! `Name <email>` shape. Mapping that opaque string to a comparable
//! identity key is kept here as pure functions so the pagination and
//! network code never has to reason about it.

use std::collections::HashSet;

/// Extract the email address from a free-text author string.
///
/// Returns the text between the first `<` and the `>` that follows it.
/// `None` means the string carries no such pair at all; an empty pair
/// (`<>`) yields `Some("")`.
#[must_use]
pub fn extract_email(raw: &str) -> Option<&str> {
    let start = raw.find('<')?;
    let rest = &raw[start + 1..];
    let end = rest.find('>')?;
    Some(&rest[..end])
}

/// Parse a space-separated, optionally double-quoted identity list.
///
/// This is the configuration surface's list format for author emails and
/// ignored repositories: quotes are stripped and the remainder is split
/// on single spaces, entries kept verbatim. An empty input therefore
/// yields the lone empty identity, which matches authors with no
/// extractable address.
#[must_use]
pub fn parse_identity_list(raw: &str) -> HashSet<String> {
    raw.replace('"', "")
        .split(' ')
        .map(str::to_string)
        .collect()
}

/// Filter deciding which commits belong to the configured user.
#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    /// Identity emails belonging to the user.
    pub emails: HashSet<String>,
}

impl CommitFilter {
    #[must_use]
    pub fn new(emails: HashSet<String>) -> Self {
        Self { emails }
    }

    /// Map a raw author string to its identity and keep it only if that
    /// identity is one of the configured emails.
    ///
    /// A string with no extractable address is treated as the empty
    /// identity, so it matches only when `""` itself is configured.
    #[must_use]
    pub fn matches(&self, raw_author: &str) -> Option<String> {
        let identity = extract_email(raw_author).unwrap_or("");
        self.emails.contains(identity).then(|| identity.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[&str]) -> HashSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extract_email_returns_address_between_angle_brackets() {
        assert_eq!(extract_email("Jane Doe <jane@x.com>"), Some("jane@x.com"));
        assert_eq!(extract_email("<only@addr.io>"), Some("only@addr.io"));
    }

    #[test]
    fn extract_email_uses_first_bracket_pair() {
        assert_eq!(
            extract_email("Weird <first@a.io> trailing <second@b.io>"),
            Some("first@a.io")
        );
    }

    #[test]
    fn extract_email_returns_none_without_brackets() {
        assert_eq!(extract_email("Jane Doe"), None);
        assert_eq!(extract_email(""), None);
        assert_eq!(extract_email("jane@x.com"), None);
    }

    #[test]
    fn extract_email_returns_none_for_unclosed_bracket() {
        assert_eq!(extract_email("Jane <jane@x.com"), None);
    }

    #[test]
    fn extract_email_yields_empty_for_empty_pair() {
        assert_eq!(extract_email("Nobody <>"), Some(""));
    }

    #[test]
    fn parse_identity_list_splits_on_spaces_and_strips_quotes() {
        let parsed = parse_identity_list(r#""jane@x.com" "jane@work.io""#);
        assert_eq!(parsed, set(&["jane@x.com", "jane@work.io"]));

        let unquoted = parse_identity_list("repo-one repo-two");
        assert_eq!(unquoted, set(&["repo-one", "repo-two"]));
    }

    #[test]
    fn parse_identity_list_of_empty_input_is_the_empty_identity() {
        assert_eq!(parse_identity_list(""), set(&[""]));
    }

    #[test]
    fn commit_filter_keeps_configured_identity() {
        let filter = CommitFilter::new(set(&["jane@x.com"]));
        assert_eq!(
            filter.matches("Jane Doe <jane@x.com>"),
            Some("jane@x.com".to_string())
        );
    }

    #[test]
    fn commit_filter_drops_other_identities() {
        let filter = CommitFilter::new(set(&["other@x.com"]));
        assert_eq!(filter.matches("Jane Doe <jane@x.com>"), None);
    }

    #[test]
    fn commit_filter_drops_bracketless_author_unless_empty_is_configured() {
        let filter = CommitFilter::new(set(&["jane@x.com"]));
        assert_eq!(filter.matches("Jane Doe"), None);

        let with_empty = CommitFilter::new(set(&["jane@x.com", ""]));
        assert_eq!(with_empty.matches("Jane Doe"), Some(String::new()));
    }

    #[test]
    fn commit_filter_with_no_emails_matches_nothing() {
        let filter = CommitFilter::default();
        assert_eq!(filter.matches("Jane Doe <jane@x.com>"), None);
        assert_eq!(filter.matches("Jane Doe"), None);
    }
}
