//! In-process index engine

use super::{Category, IndexEngine, MatchMode, Matcher, RawRecord};
use std::collections::HashMap;

/// Index held entirely in memory.
///
/// Entries are keyed by (category, word); adding the same word again from
/// another document appends that document to the existing entry. Queries
/// return entries in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    entries: Vec<(Category, RawRecord)>,
    positions: HashMap<(Category, String), usize>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `document` contributed `word` under `category`
    pub fn add(&mut self, category: Category, word: impl Into<String>, document: impl Into<String>) {
        let word = word.into();
        let document = document.into();

        match self.positions.get(&(category, word.clone())) {
            Some(&pos) => {
                let record = &mut self.entries[pos].1;
                if !record.has_document(&document) {
                    record.documents.push(document);
                }
            }
            None => {
                self.positions
                    .insert((category, word.clone()), self.entries.len());
                self.entries
                    .push((category, RawRecord::new(word, vec![document])));
            }
        }
    }

    /// Builder-style [`MemoryIndex::add`]
    pub fn with(mut self, category: Category, word: impl Into<String>, document: impl Into<String>) -> Self {
        self.add(category, word, document);
        self
    }

    /// Drop `document` from every entry, removing entries left without documents.
    /// Returns the number of entries removed.
    pub fn remove_document(&mut self, document: &str) -> usize {
        let before = self.entries.len();
        for (_, record) in &mut self.entries {
            record.documents.retain(|d| d != document);
        }
        self.entries.retain(|(_, record)| !record.documents.is_empty());

        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (category, record))| ((*category, record.word.clone()), i))
            .collect();

        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IndexEngine for MemoryIndex {
    fn query(
        &self,
        categories: &[Category],
        pattern: &str,
        mode: MatchMode,
    ) -> crate::Result<Vec<RawRecord>> {
        let matcher = Matcher::new(pattern, mode)?;

        Ok(self
            .entries
            .iter()
            .filter(|(category, record)| categories.contains(category) && matcher.is_match(&record.word))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
