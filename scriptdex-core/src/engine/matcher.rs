//! Word matching shared by the bundled engines

use super::{MatchMode, MATCH_ALL};
use crate::error::ScriptdexError;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

/// A compiled (pattern, mode) pair.
///
/// Strategy precedence when several bits are set: regex, then glob pattern,
/// then prefix. Regex patterns are compiled exactly as given, so case
/// folding there is opted into with `(?i)`; `CASE_SENSITIVE` governs the
/// other strategies.
#[derive(Debug, Clone)]
pub enum Matcher {
    All,
    Exact { pattern: String, case_sensitive: bool },
    Prefix { prefix: String, case_sensitive: bool },
    Glob(GlobMatcher),
    Regex(Regex),
}

impl Matcher {
    pub fn new(pattern: &str, mode: MatchMode) -> crate::Result<Self> {
        let case_sensitive = mode.is_case_sensitive();

        if mode.contains(MatchMode::REGEX_MATCH) {
            let regex = Regex::new(pattern).map_err(|e| ScriptdexError::InvalidPattern {
                mode: "regex",
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            return Ok(Self::Regex(regex));
        }

        if mode.contains(MatchMode::PATTERN_MATCH) {
            if pattern == MATCH_ALL {
                return Ok(Self::All);
            }
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .literal_separator(false)
                .build()
                .map_err(|e| ScriptdexError::InvalidPattern {
                    mode: "glob",
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            return Ok(Self::Glob(glob.compile_matcher()));
        }

        let pattern = fold(pattern, case_sensitive);
        if mode.contains(MatchMode::PREFIX_MATCH) {
            Ok(Self::Prefix {
                prefix: pattern,
                case_sensitive,
            })
        } else {
            Ok(Self::Exact {
                pattern,
                case_sensitive,
            })
        }
    }

    pub fn is_match(&self, word: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact {
                pattern,
                case_sensitive,
            } => fold(word, *case_sensitive) == *pattern,
            Self::Prefix {
                prefix,
                case_sensitive: true,
            } => word.starts_with(prefix.as_str()),
            Self::Prefix {
                prefix,
                case_sensitive: false,
            } => word.to_lowercase().starts_with(prefix.as_str()),
            Self::Glob(glob) => glob.is_match(word),
            Self::Regex(regex) => regex.is_match(word),
        }
    }
}

fn fold(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}
