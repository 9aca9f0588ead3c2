//! Decoding of raw index records into descriptors
//!
//! Record layout (`D` primary delimiter, `S` sub-delimiter):
//!
//! ```text
//! type:      name D parent S parent ... D description
//! property:  owner D name D types D description
//! function:  owner D name D returnTypes D param S param ... D description
//! event:     owner D name D field S field ... D description
//! ```
//!
//! Parameters and event fields are `name` or `name:Type1|Type2`. A member
//! may instead carry one JSON object after its name. Trailing fields may be
//! omitted and empty fields count as absent. A record without a name
//! decodes to `None`.

use crate::config::Delimiters;
use crate::engine::{Category, RawRecord};
use crate::model::{
    EventInfo, EventProperty, FunctionInfo, MemberDescriptor, MemberKind, ParameterInfo,
    PropertyInfo, TypeDescriptor,
};
use serde::Deserialize;

/// Column of the first category-specific member field
const MEMBER_FIELDS_START: usize = 2;

/// Separates the types of one parameter or event field (`x:Number|String`)
pub(crate) const TYPE_LIST_SEPARATOR: &str = "|";
/// Separates a parameter or event field name from its types
pub(crate) const TYPE_ANNOTATION: char = ':';

#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    delimiters: Delimiters,
}

impl RecordDecoder {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    pub fn decode_type(&self, record: &RawRecord) -> Option<TypeDescriptor> {
        let columns = self.columns(&record.word);

        let Some(name) = field(&columns, 0) else {
            dropped(Category::Type, record);
            return None;
        };

        Some(TypeDescriptor {
            name: name.to_string(),
            parent_types: field(&columns, 1)
                .map(|parents| self.sub_list(parents))
                .unwrap_or_default(),
            description: field(&columns, 2).map(str::to_string),
            documents: record.documents.clone(),
            ..Default::default()
        })
    }

    pub fn decode_property(&self, record: &RawRecord) -> Option<MemberDescriptor> {
        self.decode_member(Category::Property, record)
    }

    pub fn decode_function(&self, record: &RawRecord) -> Option<MemberDescriptor> {
        self.decode_member(Category::Function, record)
    }

    pub fn decode_event(&self, record: &RawRecord) -> Option<MemberDescriptor> {
        self.decode_member(Category::Event, record)
    }

    /// Decode a member record of `category`. `Type` and `Require` records
    /// are not members and always yield `None`.
    pub fn decode_member(
        &self,
        category: Category,
        record: &RawRecord,
    ) -> Option<MemberDescriptor> {
        let mut parts = record.word.splitn(MEMBER_FIELDS_START + 1, self.delimiters.primary);
        let owning_type = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();

        if name.is_empty() {
            dropped(category, record);
            return None;
        }

        let decoded = if rest.trim_start().starts_with('{') {
            self.json_payload(category, rest)
        } else {
            self.positional_payload(category, &self.columns(rest))
        };

        let Some((description, kind)) = decoded else {
            dropped(category, record);
            return None;
        };

        Some(MemberDescriptor {
            name: name.to_string(),
            owning_type: owning_type.to_string(),
            description,
            documents: record.documents.clone(),
            kind,
        })
    }

    /// Module paths of a require record
    pub fn decode_require_paths<'a>(&self, record: &'a RawRecord) -> impl Iterator<Item = &'a str> {
        record
            .word
            .split(self.delimiters.sub)
            .filter(|path| !path.is_empty())
    }

    /// Type name of a type record: the text before the first delimiter.
    /// `None` when the word has no delimiter at all or the name is empty.
    pub fn type_name<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        record
            .word
            .split_once(self.delimiters.primary)
            .map(|(name, _)| name)
            .filter(|name| !name.is_empty())
    }

    fn positional_payload(&self, category: Category, fields: &[&str]) -> Option<(Option<String>, MemberKind)> {
        let describe = |i: usize| field(fields, i).map(str::to_string);

        let decoded = match category {
            Category::Property => (
                describe(1),
                MemberKind::Property(PropertyInfo {
                    types: field(fields, 0)
                        .map(|t| self.sub_list(t))
                        .unwrap_or_default(),
                    ..Default::default()
                }),
            ),
            Category::Function => (
                describe(2),
                MemberKind::Function(FunctionInfo {
                    return_types: field(fields, 0)
                        .map(|t| self.sub_list(t))
                        .unwrap_or_default(),
                    parameters: field(fields, 1)
                        .map(|p| self.parameters(p))
                        .unwrap_or_default(),
                    ..Default::default()
                }),
            ),
            Category::Event => (
                describe(1),
                MemberKind::Event(EventInfo {
                    properties: field(fields, 0)
                        .map(|p| self.event_properties(p))
                        .unwrap_or_default(),
                }),
            ),
            Category::Type | Category::Require => return None,
        };

        Some(decoded)
    }

    fn json_payload(&self, category: Category, payload: &str) -> Option<(Option<String>, MemberKind)> {
        let payload: MemberPayload = match serde_json::from_str(payload) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(%category, error = %e, "member payload is not valid JSON");
                return None;
            }
        };

        let kind = match category {
            Category::Property => MemberKind::Property(PropertyInfo {
                types: payload.types,
                is_class_property: payload.is_class_property,
                is_instance_property: payload.is_instance_property,
                since: payload.since,
            }),
            Category::Function => MemberKind::Function(FunctionInfo {
                return_types: payload.return_types,
                parameters: payload.parameters,
                is_constructor: payload.is_constructor,
                is_method: payload.is_method,
                is_class_property: payload.is_class_property,
                is_instance_property: payload.is_instance_property,
                since: payload.since,
            }),
            Category::Event => MemberKind::Event(EventInfo {
                properties: payload.properties,
            }),
            Category::Type | Category::Require => return None,
        };

        Some((payload.description.filter(|d| !d.is_empty()), kind))
    }

    fn columns<'a>(&self, word: &'a str) -> Vec<&'a str> {
        word.split(self.delimiters.primary).collect()
    }

    fn sub_list(&self, field: &str) -> Vec<String> {
        field
            .split(self.delimiters.sub)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parameters(&self, field: &str) -> Vec<ParameterInfo> {
        self.annotated_names(field)
            .map(|(name, types)| ParameterInfo {
                name,
                types,
                ..Default::default()
            })
            .collect()
    }

    fn event_properties(&self, field: &str) -> Vec<EventProperty> {
        self.annotated_names(field)
            .map(|(name, types)| EventProperty {
                name,
                type_name: (!types.is_empty()).then(|| types.join(TYPE_LIST_SEPARATOR)),
                description: None,
            })
            .collect()
    }

    /// `name` / `name:A|B` entries of a sub-list
    fn annotated_names<'a>(&self, field: &'a str) -> impl Iterator<Item = (String, Vec<String>)> + 'a {
        field
            .split(self.delimiters.sub)
            .filter_map(|entry| {
                let (name, types) = match entry.split_once(TYPE_ANNOTATION) {
                    Some((name, types)) => (
                        name,
                        types
                            .split(TYPE_LIST_SEPARATOR)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ),
                    None => (entry, Vec::new()),
                };
                (!name.is_empty()).then(|| (name.to_string(), types))
            })
    }
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new(Delimiters::DEFAULT)
    }
}

/// JSON form of a member's details as written by the indexer
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MemberPayload {
    description: Option<String>,
    types: Vec<String>,
    return_types: Vec<String>,
    parameters: Vec<ParameterInfo>,
    properties: Vec<EventProperty>,
    is_class_property: bool,
    is_instance_property: bool,
    is_constructor: bool,
    is_method: bool,
    since: Vec<String>,
}

/// Non-empty column `i`, if present
fn field<'a>(columns: &[&'a str], i: usize) -> Option<&'a str> {
    columns.get(i).copied().filter(|c| !c.is_empty())
}

fn dropped(category: Category, record: &RawRecord) {
    tracing::debug!(
        %category,
        word = ?record.word,
        documents = ?record.documents,
        "skipping malformed index record"
    );
}
