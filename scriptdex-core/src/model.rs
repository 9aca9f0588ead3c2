//! Symbol descriptors decoded from index records

use crate::engine::Category;
use serde::{Deserialize, Serialize};

/// A type and, once attached, its members.
///
/// Several descriptors may share a name when different documents
/// contribute partial definitions; merging them is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    /// Properties and functions; a function is a callable property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<MemberDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<MemberDescriptor>,
    /// True when members were attached from the index, making this node
    /// (rather than any cached flattened form) authoritative.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub serialize_properties: bool,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_property(&mut self, member: MemberDescriptor) {
        self.properties.push(member);
    }

    pub fn add_event(&mut self, member: MemberDescriptor) {
        self.events.push(member);
    }

    /// Attached functions only
    pub fn functions(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.properties.iter().filter(|m| m.is_function())
    }

    /// First attached property or function named `name`
    pub fn property(&self, name: &str) -> Option<&MemberDescriptor> {
        self.properties.iter().find(|m| m.name == name)
    }
}

/// Fields every member category shares, plus the category payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    pub owning_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(flatten)]
    pub kind: MemberKind,
}

impl MemberDescriptor {
    pub fn category(&self) -> Category {
        match self.kind {
            MemberKind::Property(_) => Category::Property,
            MemberKind::Function(_) => Category::Function,
            MemberKind::Event(_) => Category::Event,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, MemberKind::Function(_))
    }

    /// Types a value of this member may hold: the declared types of a
    /// property, the return types of a function, nothing for an event.
    pub fn value_types(&self) -> &[String] {
        match &self.kind {
            MemberKind::Property(p) => &p.types,
            MemberKind::Function(f) => &f.return_types,
            MemberKind::Event(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberKind {
    Property(PropertyInfo),
    Function(FunctionInfo),
    Event(EventInfo),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_class_property: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_instance_property: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub since: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(default)]
    pub return_types: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_constructor: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_method: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_class_property: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_instance_property: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub since: Vec<String>,
}

impl FunctionInfo {
    /// `name(a, b)` style signature without types
    pub fn signature(&self, name: &str) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{name}({params})")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    /// `required`, `optional`, `one-or-more`, ... as written by the indexer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Fields of the event payload
    #[serde(default)]
    pub properties: Vec<EventProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventProperty {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
