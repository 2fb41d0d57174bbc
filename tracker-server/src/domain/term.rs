//! Search term classification.

use std::fmt;

/// A classified search term.
///
/// Users type a single search box entry which is either a public line code
/// (e.g. "1017-10") or a vehicle fleet prefix (e.g. "12345"). The two are
/// distinguished purely by shape: a prefix is exactly 4 or 5 consecutive
/// ASCII digits and nothing else. Classification is total (every string
/// lands in exactly one variant) and stateless, so repeated calls always
/// agree.
///
/// # Examples
///
/// ```
/// use tracker_server::domain::SearchTerm;
///
/// assert!(matches!(SearchTerm::classify("1017-10"), SearchTerm::LineCode(_)));
/// assert!(matches!(SearchTerm::classify("12345"), SearchTerm::Prefix(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchTerm {
    /// A public line identifier, queried via line search.
    LineCode(String),

    /// A vehicle fleet prefix, located by scanning candidate lines.
    Prefix(String),
}

impl SearchTerm {
    /// Classify a raw search string.
    ///
    /// The input is trimmed first; surrounding whitespace never changes the
    /// classification. Exactly 4 or 5 ASCII digits means `Prefix`; anything
    /// else (including the empty string) is a `LineCode`.
    pub fn classify(raw: &str) -> Self {
        let term = raw.trim();
        if is_prefix_shaped(term) {
            SearchTerm::Prefix(term.to_string())
        } else {
            SearchTerm::LineCode(term.to_string())
        }
    }

    /// The trimmed term text.
    pub fn as_str(&self) -> &str {
        match self {
            SearchTerm::LineCode(s) | SearchTerm::Prefix(s) => s,
        }
    }

    /// Whether this term is a fleet prefix.
    pub fn is_prefix(&self) -> bool {
        matches!(self, SearchTerm::Prefix(_))
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for strings of exactly 4 or 5 ASCII digits.
fn is_prefix_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    (bytes.len() == 4 || bytes.len() == 5) && bytes.iter().all(|b| b.is_ascii_digit())
}

/// Split raw terms into line codes and prefixes, preserving input order.
///
/// Blank entries are dropped: an empty search box row is noise, not a term.
pub fn partition_terms(raw: &[String]) -> (Vec<String>, Vec<String>) {
    let mut lines = Vec::new();
    let mut prefixes = Vec::new();

    for term in raw {
        if term.trim().is_empty() {
            continue;
        }
        match SearchTerm::classify(term) {
            SearchTerm::LineCode(code) => lines.push(code),
            SearchTerm::Prefix(prefix) => prefixes.push(prefix),
        }
    }

    (lines, prefixes)
}
