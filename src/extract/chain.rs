//! Generic ordered-chain evaluators
//!
//! Every output field is backed by an ordered list of extraction patterns.
//! [`PatternChain`] is the single evaluator behind all of them: patterns are
//! tried in a fixed priority order and the first capture passing the chain's
//! validity bounds wins. Later patterns are never consulted once one wins,
//! and two patterns' output is never merged.
//!
//! Description is the one field with a different tie-break: among all
//! matches of all its patterns, the longest valid candidate wins. That
//! asymmetry is intentional and kept as a separate evaluation mode.

use crate::normalize::clean_text;
use regex::{Regex, RegexBuilder};

/// An ordered list of regex strategies for one field, with length bounds
/// acting as the field's validity predicate.
#[derive(Debug)]
pub struct PatternChain {
    patterns: Vec<Regex>,
    min_len: usize,
    max_len: usize,
}

impl PatternChain {
    /// Compiles a chain from hardcoded patterns. Case-insensitive, with `.`
    /// matching newlines so labeled sections can span lines.
    ///
    /// # Panics
    ///
    /// Panics if a pattern does not compile; chains are built from fixed
    /// pattern tables, so this is a programming error, not input handling.
    pub fn new(patterns: &[&str], min_len: usize, max_len: usize) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .expect("hardcoded regex pattern is valid")
            })
            .collect();
        Self {
            patterns,
            min_len,
            max_len,
        }
    }

    /// Checks the cleaned capture against the chain's length bounds
    fn is_valid(&self, cleaned: &str) -> bool {
        let len = cleaned.chars().count();
        len >= self.min_len && len <= self.max_len
    }

    /// Evaluates the chain: the first pattern whose first capture passes the
    /// validity bounds wins. Returns the cleaned capture.
    pub fn first_match(&self, text: &str) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(text) {
                if let Some(value) = caps.get(1) {
                    let cleaned = clean_text(value.as_str());
                    if self.is_valid(&cleaned) {
                        return Some(cleaned);
                    }
                }
            }
        }
        None
    }

    /// Evaluates the chain in longest-match mode: all matches of all
    /// patterns compete and the longest valid candidate wins.
    pub fn longest_match(&self, text: &str) -> Option<String> {
        let mut best: Option<String> = None;
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(value) = caps.get(1) {
                    let cleaned = clean_text(value.as_str());
                    if !self.is_valid(&cleaned) {
                        continue;
                    }
                    let longer = best
                        .as_ref()
                        .map(|b| cleaned.chars().count() > b.chars().count())
                        .unwrap_or(true);
                    if longer {
                        best = Some(cleaned);
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pattern_wins_over_later() {
        let chain = PatternChain::new(&[r"Shelf Life:\s*([^\n.]+)", r"Lasts up to (\d+ days)"], 3, 200);
        let text = "Lasts up to 9 days. Shelf Life: 12 months frozen";
        // The labeled section is the higher-priority pattern even though the
        // loose fallback appears earlier in the text.
        assert_eq!(chain.first_match(text).as_deref(), Some("12 months frozen"));
    }

    #[test]
    fn test_falls_through_to_next_pattern() {
        let chain = PatternChain::new(&[r"Shelf Life:\s*([^\n.]+)", r"Lasts up to (\d+ days)"], 3, 200);
        assert_eq!(
            chain.first_match("Lasts up to 9 days in the fridge").as_deref(),
            Some("9 days")
        );
    }

    #[test]
    fn test_too_short_capture_rejected() {
        let chain = PatternChain::new(&[r"Storage:\s*(\S+)"], 10, 200);
        assert_eq!(chain.first_match("Storage: cold"), None);
    }

    #[test]
    fn test_too_long_capture_rejected() {
        let chain = PatternChain::new(&[r"Note:\s*(.+)"], 1, 10);
        assert_eq!(chain.first_match(&format!("Note: {}", "x".repeat(50))), None);
    }

    #[test]
    fn test_invalid_first_does_not_block_second_pattern() {
        let chain = PatternChain::new(&[r"Storage:\s*(\S+)", r"Keep (frozen at -18C always)"], 10, 200);
        assert_eq!(
            chain.first_match("Storage: cold. Keep frozen at -18C always").as_deref(),
            Some("frozen at -18C always")
        );
    }

    #[test]
    fn test_longest_match_prefers_longer_hit() {
        let chain = PatternChain::new(
            &[r"([A-Z][^.]*premium[^.]*\.)", r"([A-Z][^.]*delicious[^.]*\.)"],
            10,
            500,
        );
        let text = "A premium treat. Absolutely delicious brownies made with real Belgian chocolate.";
        assert_eq!(
            chain.longest_match(text).as_deref(),
            Some("Absolutely delicious brownies made with real Belgian chocolate.")
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let chain = PatternChain::new(&[r"Shelf Life:\s*([^\n]+)"], 3, 200);
        assert_eq!(chain.first_match("no labels here"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let chain = PatternChain::new(&[r"shelf life:\s*([^\n.]+)"], 3, 200);
        assert_eq!(
            chain.first_match("SHELF LIFE: 6 months").as_deref(),
            Some("6 months")
        );
    }
}
