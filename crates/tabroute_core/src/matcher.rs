//! Pattern matching for tab URLs and titles.
//!
//! # Responsibility
//! - Decide whether one piece of text satisfies one pattern.
//! - Classify browser-internal URLs that routing must never touch.
//!
//! # Invariants
//! - Empty text never matches; blank patterns never match.
//! - Invalid regex patterns behave as "no match" and never surface errors.

use crate::model::config::MatchMode;
use log::warn;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Mutex;

const MAX_CACHED_PATTERNS: usize = 256;

const INTERNAL_URL_PREFIXES: &[&str] = &[
    "chrome:",
    "chrome-extension:",
    "chrome-search:",
    "chrome-untrusted:",
    "edge:",
    "brave:",
    "about:",
    "moz-extension:",
    "view-source:",
    "devtools:",
];

// `None` marks a pattern that failed to compile, so it is logged only once.
static REGEX_CACHE: Lazy<Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns whether `text` satisfies `pattern` under `mode`.
pub fn matches(text: &str, pattern: &str, mode: MatchMode) -> bool {
    if text.is_empty() || pattern.trim().is_empty() {
        return false;
    }

    match mode {
        MatchMode::Simple => text.to_lowercase().contains(&pattern.to_lowercase()),
        MatchMode::Regex => with_compiled(pattern, |regex| regex.is_match(text)),
    }
}

/// Returns whether any of `patterns` matches `text`.
pub fn matches_any<S: AsRef<str>>(text: &str, patterns: &[S], mode: MatchMode) -> bool {
    patterns
        .iter()
        .any(|pattern| matches(text, pattern.as_ref(), mode))
}

/// Returns whether `url` is empty or uses a browser-internal scheme.
pub fn is_internal_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lowered = trimmed.to_ascii_lowercase();
    INTERNAL_URL_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

fn with_compiled(pattern: &str, check: impl FnOnce(&Regex) -> bool) -> bool {
    let mut cache = match REGEX_CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if !cache.contains_key(pattern) {
        if cache.len() >= MAX_CACHED_PATTERNS {
            cache.clear();
        }
        let compiled = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(err) => {
                warn!(
                    "event=pattern_compile module=matcher status=error pattern_len={} error={}",
                    pattern.len(),
                    first_line(&err.to_string())
                );
                None
            }
        };
        cache.insert(pattern.to_string(), compiled);
    }

    cache
        .get(pattern)
        .and_then(Option::as_ref)
        .is_some_and(check)
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{is_internal_url, matches, matches_any};
    use crate::model::config::MatchMode;

    #[test]
    fn simple_mode_is_case_insensitive_substring() {
        assert!(matches("https://GitHub.com/org", "github", MatchMode::Simple));
        assert!(matches("Feature branch - 3003", "3003", MatchMode::Simple));
        assert!(!matches("https://gitlab.com", "github", MatchMode::Simple));
    }

    #[test]
    fn empty_text_and_blank_pattern_never_match() {
        assert!(!matches("", "x", MatchMode::Simple));
        assert!(!matches("anything", "", MatchMode::Simple));
        assert!(!matches("anything", "   ", MatchMode::Regex));
        assert!(!matches("", ".*", MatchMode::Regex));
    }

    #[test]
    fn regex_mode_is_case_insensitive() {
        assert!(matches(
            "https://JIRA.example.com/browse/ABC-1",
            r"jira\.example\.com/browse/[a-z]+-\d+",
            MatchMode::Regex
        ));
    }

    #[test]
    fn invalid_regex_is_treated_as_no_match() {
        assert!(!matches("(((", "(((", MatchMode::Regex));
        // Cached failure stays a no-match.
        assert!(!matches("(((", "(((", MatchMode::Regex));
    }

    #[test]
    fn matches_any_checks_every_pattern() {
        let patterns = vec!["nope".to_string(), "docs".to_string()];
        assert!(matches_any("Team docs", &patterns, MatchMode::Simple));
        assert!(!matches_any("Team wiki", &patterns, MatchMode::Simple));
    }

    #[test]
    fn internal_urls_are_detected() {
        assert!(is_internal_url(""));
        assert!(is_internal_url("chrome://newtab/"));
        assert!(is_internal_url("Chrome-Extension://abc/options.html"));
        assert!(is_internal_url("about:blank"));
        assert!(!is_internal_url("https://example.com"));
        assert!(!is_internal_url("file:///tmp/index.html"));
    }
}
