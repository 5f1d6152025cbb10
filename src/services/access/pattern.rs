//! Path patterns used by the access policy.
//!
//! A pattern is a literal path prefix, optionally followed by a trailing
//! wildcard (`(.*)` or `*`). Both forms match by prefix: `/admin` governs
//! `/admin/settings` just like `/admin(.*)` does. The wildcard only documents
//! intent in the policy source.

use std::fmt;

const WILDCARD_SUFFIXES: [&str; 2] = ["(.*)", "*"];
const FORBIDDEN_CHARS: [char; 6] = ['*', '(', ')', '?', '#', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Empty,
    MissingLeadingSlash(String),
    InvalidCharacter { pattern: String, ch: char },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "path pattern is empty"),
            PatternError::MissingLeadingSlash(p) => {
                write!(f, "path pattern must start with '/': {}", p)
            }
            PatternError::InvalidCharacter { pattern, ch } => {
                write!(f, "path pattern {} contains invalid character {:?}", pattern, ch)
            }
        }
    }
}

impl std::error::Error for PatternError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    literal: String,
    wildcard: bool,
}

impl PathPattern {
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let (literal, wildcard) = WILDCARD_SUFFIXES
            .iter()
            .find_map(|suffix| source.strip_suffix(*suffix).map(|rest| (rest, true)))
            .unwrap_or((source, false));

        if !literal.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(source.to_string()));
        }

        if let Some(ch) = literal
            .chars()
            .find(|c| c.is_whitespace() || FORBIDDEN_CHARS.contains(c))
        {
            return Err(PatternError::InvalidCharacter {
                pattern: source.to_string(),
                ch,
            });
        }

        Ok(Self {
            source: source.to_string(),
            literal: literal.to_string(),
            wildcard,
        })
    }

    /// Prefix match against an already-normalized request path.
    /// Path comparison is case-sensitive.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.literal)
    }

    /// True when every path this pattern matches is also matched by `other`.
    pub fn is_covered_by(&self, other: &PathPattern) -> bool {
        self.literal.starts_with(&other.literal)
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_forms_strip_to_literal() {
        let p = PathPattern::parse("/admin(.*)").unwrap();
        assert_eq!(p.literal(), "/admin");
        assert!(p.is_wildcard());

        let p = PathPattern::parse("/tutor*").unwrap();
        assert_eq!(p.literal(), "/tutor");
        assert!(p.is_wildcard());

        let p = PathPattern::parse("/List/exams").unwrap();
        assert_eq!(p.literal(), "/List/exams");
        assert!(!p.is_wildcard());
    }

    #[test]
    fn both_forms_match_by_prefix() {
        let wild = PathPattern::parse("/admin(.*)").unwrap();
        let exact = PathPattern::parse("/admin").unwrap();
        for path in ["/admin", "/admin/settings", "/administrators"] {
            assert!(wild.matches(path), "{path}");
            assert!(exact.matches(path), "{path}");
        }
        assert!(!wild.matches("/profile"));
        assert!(!exact.matches("/ad"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let p = PathPattern::parse("/List/tutors").unwrap();
        assert!(p.matches("/List/tutors"));
        assert!(!p.matches("/list/tutors"));
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("admin(.*)"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::parse("/a*/b"),
            Err(PatternError::InvalidCharacter { ch: '*', .. })
        ));
        assert!(matches!(
            PathPattern::parse("/list/ exams"),
            Err(PatternError::InvalidCharacter { ch: ' ', .. })
        ));
        assert!(matches!(
            PathPattern::parse("/search?q"),
            Err(PatternError::InvalidCharacter { ch: '?', .. })
        ));
        // only one trailing wildcard is stripped
        assert!(PathPattern::parse("/a(.*)(.*)").is_err());
    }

    #[test]
    fn coverage_follows_literal_prefixes() {
        let broad = PathPattern::parse("/List(.*)").unwrap();
        let narrow = PathPattern::parse("/List/tutors").unwrap();
        assert!(narrow.is_covered_by(&broad));
        assert!(!broad.is_covered_by(&narrow));
    }
}
