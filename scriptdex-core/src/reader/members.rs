//! Member attachment: one type record plus its member records

use super::{is_blank, IndexReader};
use crate::engine::IndexEngine;
use crate::model::TypeDescriptor;

impl IndexReader {
    /// Query the properties, functions and events owned by `ty` and append
    /// them to it. Functions go into `properties` next to the plain
    /// properties. Always three engine round-trips; a type without a name
    /// is left untouched.
    pub fn attach_members<I>(&self, index: &I, ty: &mut TypeDescriptor) -> crate::Result<()>
    where
        I: IndexEngine + ?Sized,
    {
        if is_blank(&ty.name) {
            return Ok(());
        }

        let properties = self.properties_for_type(index, &ty.name)?;
        let functions = self.functions_for_type(index, &ty.name)?;
        let events = self.events_for_type(index, &ty.name)?;

        ty.properties.extend(properties);
        ty.properties.extend(functions);
        ty.events.extend(events);

        Ok(())
    }

    /// Attach members and mark the type as assembled from the index
    pub(super) fn assemble<I>(&self, index: &I, ty: &mut TypeDescriptor) -> crate::Result<()>
    where
        I: IndexEngine + ?Sized,
    {
        self.attach_members(index, ty)?;
        ty.serialize_properties = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{Category, MemoryIndex};
    use crate::model::{MemberKind, TypeDescriptor};
    use crate::reader::IndexReader;

    #[test]
    fn test_attach_without_members_leaves_type_empty() {
        let index = MemoryIndex::new().with(Category::Type, "Lonely\0", "l.js");
        let mut ty = TypeDescriptor::new("Lonely");

        IndexReader::default().attach_members(&index, &mut ty).unwrap();

        assert!(ty.properties.is_empty());
        assert!(ty.events.is_empty());
        assert!(!ty.serialize_properties);
    }

    #[test]
    fn test_attach_sorts_members_by_kind() {
        let index = MemoryIndex::new()
            .with(Category::Event, "Widget\0click\0", "w.js")
            .with(Category::Function, "Widget\0show\0", "w.js")
            .with(Category::Property, "Widget\0visible\0Boolean", "w.js")
            .with(Category::Property, "Other\0visible\0Boolean", "o.js");
        let mut ty = TypeDescriptor::new("Widget");

        IndexReader::default().attach_members(&index, &mut ty).unwrap();

        let names: Vec<_> = ty.properties.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["visible", "show"]);
        assert!(matches!(ty.properties[1].kind, MemberKind::Function(_)));
        assert_eq!(ty.events.len(), 1);
        assert_eq!(ty.events[0].name, "click");
    }

    #[test]
    fn test_attach_appends_to_existing_members() {
        let index = MemoryIndex::new().with(Category::Property, "Widget\0visible\0", "w.js");
        let reader = IndexReader::default();
        let mut ty = TypeDescriptor::new("Widget");

        reader.attach_members(&index, &mut ty).unwrap();
        reader.attach_members(&index, &mut ty).unwrap();

        assert_eq!(ty.properties.len(), 2);
    }

    #[test]
    fn test_attach_to_nameless_type_is_noop() {
        let index = MemoryIndex::new().with(Category::Property, "\0visible\0", "w.js");
        let mut ty = TypeDescriptor::default();

        IndexReader::default().attach_members(&index, &mut ty).unwrap();
        assert!(ty.properties.is_empty());
    }
}
