//! Category-scoped queries over a symbol index

mod members;
mod universe;

use crate::config::{Config, Delimiters};
use crate::decode::RecordDecoder;
use crate::engine::{Category, IndexEngine, MatchMode, RawRecord, MATCH_ALL};
use crate::model::MemberDescriptor;
use crate::pattern::{PatternBuilder, SearchPattern};
use std::collections::BTreeSet;

/// Reads and decodes symbol records from an [`IndexEngine`].
///
/// The reader holds no index state; every operation takes the engine it
/// should query. Blank type or member names produce empty results without
/// querying. Malformed records are skipped. Engine failures are returned.
#[derive(Debug, Clone, Copy)]
pub struct IndexReader {
    patterns: PatternBuilder,
    decoder: RecordDecoder,
    parallel_threshold: usize,
}

impl Default for IndexReader {
    fn default() -> Self {
        Self::new(Delimiters::DEFAULT)
    }
}

impl IndexReader {
    /// Type listings at or below this size attach members sequentially
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

    pub fn new(delimiters: Delimiters) -> Self {
        Self {
            patterns: PatternBuilder::new(delimiters),
            decoder: RecordDecoder::new(delimiters),
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.delimiters).with_parallel_threshold(config.query.parallel_threshold)
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn patterns(&self) -> &PatternBuilder {
        &self.patterns
    }

    pub fn decoder(&self) -> &RecordDecoder {
        &self.decoder
    }

    // Properties

    pub fn properties_for_types<I, S>(&self, index: &I, owning_types: &[S]) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
        S: AsRef<str>,
    {
        self.members_for_types(index, Category::Property, owning_types)
    }

    pub fn properties_for_type<I>(&self, index: &I, owning_type: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_for_types(index, Category::Property, &[owning_type])
    }

    pub fn properties_named<I>(&self, index: &I, owning_type: &str, name: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_named(index, Category::Property, owning_type, name)
    }

    // Functions

    pub fn functions_for_types<I, S>(&self, index: &I, owning_types: &[S]) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
        S: AsRef<str>,
    {
        self.members_for_types(index, Category::Function, owning_types)
    }

    pub fn functions_for_type<I>(&self, index: &I, owning_type: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_for_types(index, Category::Function, &[owning_type])
    }

    pub fn functions_named<I>(&self, index: &I, owning_type: &str, name: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_named(index, Category::Function, owning_type, name)
    }

    // Events

    pub fn events_for_types<I, S>(&self, index: &I, owning_types: &[S]) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
        S: AsRef<str>,
    {
        self.members_for_types(index, Category::Event, owning_types)
    }

    pub fn events_for_type<I>(&self, index: &I, owning_type: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_for_types(index, Category::Event, &[owning_type])
    }

    pub fn events_named<I>(&self, index: &I, owning_type: &str, name: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        self.members_named(index, Category::Event, owning_type, name)
    }

    /// Properties of a type followed by its functions
    pub fn type_properties<I>(&self, index: &I, type_name: &str) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        let mut properties = self.properties_for_type(index, type_name)?;
        properties.extend(self.functions_for_type(index, type_name)?);
        Ok(properties)
    }

    /// Members of `category` owned by any of `owning_types`, in engine order.
    /// Blank names are ignored; an empty list queries nothing.
    pub fn members_for_types<I, S>(
        &self,
        index: &I,
        category: Category,
        owning_types: &[S],
    ) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
        S: AsRef<str>,
    {
        let owning_types: Vec<&str> = owning_types
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|t| !is_blank(t))
            .collect();

        if owning_types.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = self.patterns.member_pattern(&owning_types);
        self.query_members(index, category, &pattern)
    }

    /// Members of `category` named exactly `name` on `owning_type`. Several
    /// document-scoped variants of one member may match.
    pub fn members_named<I>(
        &self,
        index: &I,
        category: Category,
        owning_type: &str,
        name: &str,
    ) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        if is_blank(owning_type) || is_blank(name) {
            return Ok(Vec::new());
        }

        let pattern = self.patterns.member_name_pattern(owning_type, name);
        self.query_members(index, category, &pattern)
    }

    /// Module paths required by the document at `location`, deduplicated
    pub fn requires_for_location<I>(&self, index: &I, location: &str) -> crate::Result<BTreeSet<String>>
    where
        I: IndexEngine + ?Sized,
    {
        if is_blank(location) {
            return Ok(BTreeSet::new());
        }

        let records = query(index, Category::Require, MATCH_ALL, MatchMode::PATTERN_MATCH)?;

        Ok(records
            .iter()
            .filter(|record| record.has_document(location))
            .flat_map(|record| self.decoder.decode_require_paths(record))
            .map(str::to_string)
            .collect())
    }

    fn query_members<I>(
        &self,
        index: &I,
        category: Category,
        pattern: &SearchPattern,
    ) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        let records = query(index, category, &pattern.pattern, pattern.mode)?;

        Ok(records
            .iter()
            .filter_map(|record| self.decoder.decode_member(category, record))
            .collect())
    }
}

/// Single-category engine call with trace logging
fn query<I>(index: &I, category: Category, pattern: &str, mode: MatchMode) -> crate::Result<Vec<RawRecord>>
where
    I: IndexEngine + ?Sized,
{
    let records = index.query(&[category], pattern, mode)?;
    tracing::trace!(
        %category,
        pattern = ?pattern,
        ?mode,
        matched = records.len(),
        "index query"
    );
    Ok(records)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
