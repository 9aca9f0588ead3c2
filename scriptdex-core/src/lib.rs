//! scriptdex core - symbol index reader for script content assist
//!
//! Builds search patterns over a delimited-record symbol index, runs
//! category-scoped queries against an [`IndexEngine`], and decodes the
//! matched records into type and member descriptors.

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod model;
pub mod pattern;
pub mod reader;

pub use config::{Config, Delimiters};
pub use decode::RecordDecoder;
pub use engine::{Category, IndexEngine, MatchMode, MemoryIndex, RawRecord, SqliteIndex, MATCH_ALL};
pub use error::ScriptdexError;
pub use model::{
    EventInfo, EventProperty, FunctionInfo, MemberDescriptor, MemberKind, ParameterInfo,
    PropertyInfo, TypeDescriptor,
};
pub use pattern::{strip_generics_from_type, user_types_pattern, PatternBuilder, SearchPattern};
pub use reader::IndexReader;

/// Result type alias for scriptdex operations
pub type Result<T> = std::result::Result<T, ScriptdexError>;
