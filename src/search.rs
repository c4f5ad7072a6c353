// File: src/search.rs

use regex::RegexBuilder;
use serde::Serialize;

/// A single hit of a search term. Offsets are byte offsets into the searched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Finds every non-overlapping, case-insensitive occurrence of `term` in `text`.
/// The term is matched literally, never as a pattern.
pub fn find_matches(text: &str, term: &str) -> Vec<SearchMatch> {
    if term.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let re = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    re.find_iter(text)
        .map(|mat| SearchMatch {
            start: mat.start(),
            end: mat.end(),
            text: mat.as_str().to_string(),
        })
        .collect()
}
