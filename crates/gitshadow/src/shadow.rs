//! Shadow file content model.
//!
//! A shadow file is a text blob in the destination repository, one per
//! source repository, holding the newline-separated list of source commit
//! hashes already replayed. The at-most-once line invariant here is the
//! pipeline's sole idempotence mechanism; no database backs it up.

/// Newline-separated ledger of replayed commit hashes.
///
/// Existing lines are never reordered or removed; recording only ever
/// appends. Rendering trims the result so the stored blob carries no
/// leading or trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowFile {
    content: String,
}

impl ShadowFile {
    /// Wrap existing file content as fetched from the destination host.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Ledger for a shadow file that does not exist yet.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `hash` is already recorded, by exact line match.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.content.split('\n').any(|line| line == hash)
    }

    /// Record `hash`, returning whether the ledger changed.
    ///
    /// Recording an already-present hash is a no-op and returns `false`;
    /// the caller treats that as "skip", not as an error.
    pub fn record(&mut self, hash: &str) -> bool {
        if self.contains(hash) {
            return false;
        }

        let mut lines: Vec<&str> = self.content.split('\n').collect();
        lines.push(hash);
        self.content = lines.join("\n").trim().to_string();
        true
    }

    /// The content exactly as it is committed to the destination.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Recorded hashes in ledger order, blank lines skipped.
    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').filter(|line| !line.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_on_empty_ledger_trims_the_leading_newline() {
        let mut shadow = ShadowFile::empty();
        assert!(shadow.record("a1b2c3"));
        assert_eq!(shadow.as_str(), "a1b2c3");
    }

    #[test]
    fn record_appends_in_order() {
        let mut shadow = ShadowFile::empty();
        shadow.record("first");
        shadow.record("second");
        shadow.record("third");
        assert_eq!(shadow.as_str(), "first\nsecond\nthird");
        let hashes: Vec<&str> = shadow.hashes().collect();
        assert_eq!(hashes, vec!["first", "second", "third"]);
    }

    #[test]
    fn record_of_present_hash_is_a_noop() {
        let mut shadow = ShadowFile::new("first\nsecond");
        assert!(!shadow.record("first"));
        assert!(!shadow.record("second"));
        assert_eq!(shadow.as_str(), "first\nsecond");
    }

    #[test]
    fn replaying_a_batch_twice_equals_replaying_it_once() {
        let batch = ["a", "b", "c"];

        let mut once = ShadowFile::empty();
        for hash in batch {
            once.record(hash);
        }

        let mut twice = once.clone();
        for hash in batch {
            assert!(!twice.record(hash));
        }

        assert_eq!(once, twice);
    }

    #[test]
    fn no_hash_appears_twice_after_interleaved_runs() {
        let mut shadow = ShadowFile::empty();
        for hash in ["a", "b", "a", "c", "b", "a", "c"] {
            shadow.record(hash);
        }

        let lines: Vec<&str> = shadow.as_str().split('\n').collect();
        let unique: std::collections::HashSet<&str> = lines.iter().copied().collect();
        assert_eq!(lines.len(), unique.len(), "each hash at most once");
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn later_records_never_reorder_existing_lines() {
        let mut shadow = ShadowFile::new("old1\nold2");
        shadow.record("new1");
        assert_eq!(shadow.as_str(), "old1\nold2\nnew1");
    }

    #[test]
    fn content_with_interior_blank_lines_still_matches_exactly() {
        let mut shadow = ShadowFile::new("first\n");
        assert!(shadow.contains("first"));
        assert!(shadow.record("second"));
        // The stray trailing newline from the fetched blob survives as an
        // interior blank, which hashes() skips.
        assert_eq!(shadow.as_str(), "first\n\nsecond");
        assert_eq!(shadow.hashes().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(shadow.len(), 2);
    }

    #[test]
    fn empty_ledger_reports_empty() {
        let shadow = ShadowFile::empty();
        assert!(shadow.is_empty());
        assert_eq!(shadow.len(), 0);
        assert_eq!(shadow.as_str(), "");
    }
}
