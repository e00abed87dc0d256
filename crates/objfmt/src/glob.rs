//! Glob patterns for the bulk binding operations.
//!
//! Patterns support `*` (any run of characters) and `?` (any single
//! character); everything else matches literally. Globs compile to
//! anchored regexes once, at configuration time.

use regex::Regex;

use crate::error::ConfigError;

/// A compiled glob pattern.
#[derive(Clone, Debug)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let mut source = String::with_capacity(pattern.len() + 8);
        source.push('^');
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| ConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(GlobPattern { regex })
    }

    /// Whether the whole of `name` matches this pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_any_run() {
        let p = GlobPattern::new("get_*").unwrap();
        assert!(p.matches("get_name"));
        assert!(p.matches("get_"));
        assert!(!p.matches("set_name"));
    }

    #[test]
    fn bare_star_matches_everything() {
        let p = GlobPattern::new("*").unwrap();
        assert!(p.matches(""));
        assert!(p.matches("anything"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let p = GlobPattern::new("id?").unwrap();
        assert!(p.matches("ids"));
        assert!(!p.matches("id"));
        assert!(!p.matches("idea!"));
    }

    #[test]
    fn literals_are_escaped() {
        let p = GlobPattern::new("a.b").unwrap();
        assert!(p.matches("a.b"));
        assert!(!p.matches("axb"));
    }

    #[test]
    fn match_is_anchored() {
        let p = GlobPattern::new("state").unwrap();
        assert!(p.matches("state"));
        assert!(!p.matches("statement"));
    }
}
