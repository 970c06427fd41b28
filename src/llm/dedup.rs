//! Near-duplicate line filter.
//!
//! Lines are keyed by the first 20 characters of their trimmed text, which
//! catches the model restating an earlier line with trailing variations.
//! A documented heuristic: two genuinely different lines sharing a 20-char
//! prefix are treated as duplicates.

use std::collections::HashSet;

pub const DEFAULT_PREFIX_CHARS: usize = 20;

pub struct LineDeduper {
    seen: HashSet<String>,
    prefix_chars: usize,
}

impl LineDeduper {
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            seen: HashSet::new(),
            prefix_chars,
        }
    }

    /// Returns true when the line is novel and non-empty; the line is then
    /// recorded as seen. Empty or already-seen lines return false.
    pub fn accept(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }

        let key: String = trimmed.chars().take(self.prefix_chars).collect();
        self.seen.insert(key)
    }
}

impl Default for LineDeduper {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_exact_duplicates() {
        let mut deduper = LineDeduper::default();
        assert!(deduper.accept("전세 자금 대출은 은행에서 신청해요."));
        assert!(!deduper.accept("전세 자금 대출은 은행에서 신청해요."));
    }

    #[test]
    fn rejects_lines_sharing_a_20_char_prefix() {
        let mut deduper = LineDeduper::default();
        let base = "a".repeat(20);
        assert!(deduper.accept(&format!("{base} first tail")));
        assert!(!deduper.accept(&format!("{base} different tail")));
    }

    #[test]
    fn short_distinct_lines_pass() {
        let mut deduper = LineDeduper::default();
        assert!(deduper.accept("A"));
        assert!(deduper.accept("B"));
        assert!(!deduper.accept("B"));
    }

    #[test]
    fn empty_and_whitespace_lines_never_pass() {
        let mut deduper = LineDeduper::default();
        assert!(!deduper.accept(""));
        assert!(!deduper.accept("   \t"));
    }

    #[test]
    fn leading_whitespace_does_not_defeat_dedup() {
        let mut deduper = LineDeduper::default();
        assert!(deduper.accept("중복되는 안내 문장입니다."));
        assert!(!deduper.accept("   중복되는 안내 문장입니다."));
    }
}
