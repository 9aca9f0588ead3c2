//! Search patterns over the encoded index words

use crate::config::Delimiters;
use crate::engine::MatchMode;

/// Prefix of a parameterized array type, e.g. `Array<Number>`
pub const GENERIC_ARRAY_OPEN: &str = "Array<";
/// Bare array type that owns the members of every `Array<T>`
pub const ARRAY_TYPE: &str = "Array";

/// A pattern plus the mode the engine must apply it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    pub pattern: String,
    pub mode: MatchMode,
}

/// Reduce `Array<T>` to `Array`; member records are only written for the
/// common array shape, never per element type.
pub fn strip_generics_from_type(type_name: &str) -> &str {
    if type_name.starts_with(GENERIC_ARRAY_OPEN) {
        ARRAY_TYPE
    } else {
        type_name
    }
}

/// Builds patterns for a fixed pair of delimiters
#[derive(Debug, Clone, Copy)]
pub struct PatternBuilder {
    delimiters: Delimiters,
}

impl PatternBuilder {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    /// Members owned by any of `type_names`.
    ///
    /// Anchored at the start and closed by the delimiter so `Foo` never
    /// matches the records of `FooBar`. Callers must pass a non-empty list.
    pub fn member_pattern<S: AsRef<str>>(&self, type_names: &[S]) -> SearchPattern {
        let alternation = type_names
            .iter()
            .map(|name| regex::escape(strip_generics_from_type(name.as_ref())))
            .collect::<Vec<_>>()
            .join("|");

        SearchPattern {
            pattern: format!(
                "^(?:{alternation}){}",
                regex_literal(self.delimiters.primary)
            ),
            mode: MatchMode::REGEX_MATCH,
        }
    }

    /// One named member of one type, matched exactly up to the second delimiter
    pub fn member_name_pattern(&self, type_name: &str, member_name: &str) -> SearchPattern {
        let delimiter = self.delimiters.primary;

        SearchPattern {
            pattern: format!(
                "{}{delimiter}{member_name}{delimiter}",
                strip_generics_from_type(type_name)
            ),
            mode: MatchMode::PREFIX_MATCH | MatchMode::CASE_SENSITIVE,
        }
    }

    /// Every record of one type, whatever its trailing fields
    pub fn type_pattern(&self, type_name: &str) -> SearchPattern {
        SearchPattern {
            pattern: format!(
                "{}{}",
                strip_generics_from_type(type_name),
                self.delimiters.primary
            ),
            mode: MatchMode::PREFIX_MATCH,
        }
    }
}

/// `(t1|t2|...)` with every name escaped, for embedding in larger regexes.
/// Assumes a non-empty list.
pub fn user_types_pattern<S: AsRef<str>>(owning_types: &[S]) -> String {
    let quoted = owning_types
        .iter()
        .map(|t| regex::escape(t.as_ref()))
        .collect::<Vec<_>>();

    format!("({})", quoted.join("|"))
}

/// Hex escape so control-character delimiters stay literal inside a regex
fn regex_literal(c: char) -> String {
    format!("\\x{{{:X}}}", c as u32)
}
