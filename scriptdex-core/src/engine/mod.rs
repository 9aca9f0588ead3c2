//! Index engine contract consumed by the reader, plus two engines that
//! implement it: an in-memory map and a SQLite file.

mod matcher;
mod memory;
mod sqlite;

pub use matcher::Matcher;
pub use memory::MemoryIndex;
pub use sqlite::SqliteIndex;

use crate::error::ScriptdexError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern that matches every word when used with [`MatchMode::PATTERN_MATCH`].
pub const MATCH_ALL: &str = "*";

/// Kind of index record. Tags are shared with the index writer and parse
/// case-insensitively (`TYPE` and `type` are the same tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Type,
    Property,
    Function,
    Event,
    Require,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Type,
        Self::Property,
        Self::Function,
        Self::Event,
        Self::Require,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Property => "property",
            Self::Function => "function",
            Self::Event => "event",
            Self::Require => "require",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScriptdexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScriptdexError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = ScriptdexError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

bitflags! {
    /// Matching strategy for an index query. No strategy bit means an exact
    /// word match; `CASE_SENSITIVE` combines with any strategy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchMode: u32 {
        const PREFIX_MATCH = 1;
        const PATTERN_MATCH = 2;
        const REGEX_MATCH = 4;
        const CASE_SENSITIVE = 8;
    }
}

impl MatchMode {
    pub const EXACT_MATCH: MatchMode = MatchMode::empty();

    pub fn is_case_sensitive(self) -> bool {
        self.contains(Self::CASE_SENSITIVE)
    }
}

/// One matched index entry: the encoded word and the documents that
/// contributed it, in the order the engine recorded them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub word: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl RawRecord {
    pub fn new(word: impl Into<String>, documents: Vec<String>) -> Self {
        Self {
            word: word.into(),
            documents,
        }
    }

    /// True if `location` is one of the contributing documents
    pub fn has_document(&self, location: &str) -> bool {
        self.documents.iter().any(|d| d == location)
    }
}

/// Storage/query backend the reader runs against.
///
/// Implementations return every record stored under any of `categories`
/// whose word satisfies `pattern` under `mode`. Failures of the backend are
/// reported as errors; an empty match is `Ok(vec![])`.
pub trait IndexEngine {
    fn query(
        &self,
        categories: &[Category],
        pattern: &str,
        mode: MatchMode,
    ) -> crate::Result<Vec<RawRecord>>;
}

impl<T: IndexEngine + ?Sized> IndexEngine for &T {
    fn query(
        &self,
        categories: &[Category],
        pattern: &str,
        mode: MatchMode,
    ) -> crate::Result<Vec<RawRecord>> {
        (**self).query(categories, pattern, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_tag() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!("TYPE".parse::<Category>().unwrap(), Category::Type);
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            "module".parse::<Category>(),
            Err(ScriptdexError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_category_deserializes_any_case() {
        let tags: Vec<Category> = serde_json::from_str(r#"["TYPE", "Property", "event"]"#).unwrap();
        assert_eq!(tags, vec![Category::Type, Category::Property, Category::Event]);
        assert_eq!(serde_json::to_string(&Category::Require).unwrap(), r#""require""#);
        assert!(serde_json::from_str::<Category>(r#""module""#).is_err());
    }

    #[test]
    fn test_match_mode_combines() {
        let mode = MatchMode::PREFIX_MATCH | MatchMode::CASE_SENSITIVE;
        assert!(mode.contains(MatchMode::PREFIX_MATCH));
        assert!(mode.is_case_sensitive());
        assert!(!MatchMode::REGEX_MATCH.is_case_sensitive());
        assert!(MatchMode::EXACT_MATCH.is_empty());
    }

    #[test]
    fn test_has_document() {
        let record = RawRecord::new("x", vec!["a.js".to_string(), "b.js".to_string()]);
        assert!(record.has_document("b.js"));
        assert!(!record.has_document("c.js"));
    }
}
