//! Type lookups and whole-index type listings

use super::{is_blank, query, IndexReader};
use crate::engine::{Category, IndexEngine, MatchMode, RawRecord, MATCH_ALL};
use crate::model::{MemberDescriptor, TypeDescriptor};
use crate::pattern::strip_generics_from_type;
use rayon::prelude::*;
use std::collections::{HashSet, VecDeque};

impl IndexReader {
    /// Every type record for `type_name`, one descriptor per record.
    ///
    /// Different documents may each contribute a partial definition; they
    /// are returned side by side, unmerged. With `include_members` each
    /// descriptor gets its members attached and is flagged as assembled.
    pub fn get_type<I>(
        &self,
        index: &I,
        type_name: &str,
        include_members: bool,
    ) -> crate::Result<Vec<TypeDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        if is_blank(type_name) {
            return Ok(Vec::new());
        }

        let pattern = self.patterns.type_pattern(type_name);
        let records = query(index, Category::Type, &pattern.pattern, pattern.mode)?;
        let mut types = self.decode_types(&records);

        if include_members {
            for ty in &mut types {
                self.assemble(index, ty)?;
            }
        }

        Ok(types)
    }

    /// Every type record in the index.
    ///
    /// Large listings attach members on the rayon pool; output order always
    /// follows the engine's record order.
    pub fn get_types<I>(&self, index: &I, include_members: bool) -> crate::Result<Vec<TypeDescriptor>>
    where
        I: IndexEngine + Sync + ?Sized,
    {
        let records = query(index, Category::Type, MATCH_ALL, MatchMode::PATTERN_MATCH)?;
        let mut types = self.decode_types(&records);

        if include_members {
            if types.len() <= self.parallel_threshold {
                for ty in &mut types {
                    self.assemble(index, ty)?;
                }
            } else {
                tracing::debug!(types = types.len(), "attaching members in parallel");
                types
                    .par_iter_mut()
                    .try_for_each(|ty| self.assemble(index, ty))?;
            }
        }

        Ok(types)
    }

    /// Names of all type records, in record order. Records whose word has
    /// no delimiter or an empty name are skipped, as `get_types` skips them.
    pub fn type_names<I>(&self, index: &I) -> crate::Result<Vec<String>>
    where
        I: IndexEngine + ?Sized,
    {
        let records = query(index, Category::Type, MATCH_ALL, MatchMode::PATTERN_MATCH)?;

        Ok(records
            .iter()
            .filter_map(|record| {
                let name = self.decoder.type_name(record);
                if name.is_none() {
                    tracing::debug!(word = ?record.word, "type record without a name");
                }
                name
            })
            .map(str::to_string)
            .collect())
    }

    /// Supertypes of `type_name`, nearest first, each listed once. Parents
    /// come from every record of each type; cycles are cut.
    pub fn type_ancestors<I>(&self, index: &I, type_name: &str) -> crate::Result<Vec<String>>
    where
        I: IndexEngine + ?Sized,
    {
        let mut ancestors = Vec::new();
        if is_blank(type_name) {
            return Ok(ancestors);
        }

        let start = strip_generics_from_type(type_name).to_string();
        let mut seen = HashSet::from([start.clone()]);
        let mut pending = VecDeque::from([start]);

        while let Some(current) = pending.pop_front() {
            for ty in self.get_type(index, &current, false)? {
                for parent in ty.parent_types {
                    let parent = strip_generics_from_type(&parent).to_string();
                    if seen.insert(parent.clone()) {
                        ancestors.push(parent.clone());
                        pending.push_back(parent);
                    }
                }
            }
        }

        Ok(ancestors)
    }

    /// Properties and functions of `type_name` and all of its supertypes,
    /// fetched with one batch query per category.
    pub fn type_properties_with_ancestors<I>(
        &self,
        index: &I,
        type_name: &str,
    ) -> crate::Result<Vec<MemberDescriptor>>
    where
        I: IndexEngine + ?Sized,
    {
        if is_blank(type_name) {
            return Ok(Vec::new());
        }

        let mut owners = vec![type_name.to_string()];
        owners.extend(self.type_ancestors(index, type_name)?);

        let mut members = self.properties_for_types(index, &owners)?;
        members.extend(self.functions_for_types(index, &owners)?);
        Ok(members)
    }

    fn decode_types(&self, records: &[RawRecord]) -> Vec<TypeDescriptor> {
        records
            .iter()
            .filter_map(|record| self.decoder.decode_type(record))
            .collect()
    }
}
