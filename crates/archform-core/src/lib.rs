pub mod builder;
pub mod docs;
pub mod error;
mod outline;
pub mod rules;
pub mod storage;
pub mod style;
pub mod view;
mod workspace;

pub use builder::{BuilderOptions, WorkspaceBuilder};
pub use docs::{DocumentationSection, Format};
pub use error::ModelError;
pub use style::{
    Border, ElementStyle, RelationshipStyle, ResolvedElementStyle, ResolvedRelationshipStyle,
    Routing, Shape, Style, Styles,
};
pub use view::{PaperSize, View, ViewBuilder, ViewKind};
pub use workspace::Workspace;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tags every element and relationship receives on creation.
pub mod tags {
    pub const ELEMENT: &str = "Element";
    pub const PERSON: &str = "Person";
    pub const SOFTWARE_SYSTEM: &str = "Software System";
    pub const CONTAINER: &str = "Container";
    pub const COMPONENT: &str = "Component";
    pub const RELATIONSHIP: &str = "Relationship";
    pub const SYNCHRONOUS: &str = "Synchronous";
    pub const ASYNCHRONOUS: &str = "Asynchronous";
}

// --- Types ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
}

impl ElementKind {
    /// The default tag carried by every element of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Person => tags::PERSON,
            ElementKind::SoftwareSystem => tags::SOFTWARE_SYSTEM,
            ElementKind::Container => tags::CONTAINER,
            ElementKind::Component => tags::COMPONENT,
        }
    }

    /// The kind an element of this kind must be nested in, if any.
    pub fn parent_kind(self) -> Option<ElementKind> {
        match self {
            ElementKind::Person | ElementKind::SoftwareSystem => None,
            ElementKind::Container => Some(ElementKind::SoftwareSystem),
            ElementKind::Component => Some(ElementKind::Container),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Person => "person",
            ElementKind::SoftwareSystem => "software system",
            ElementKind::Container => "container",
            ElementKind::Component => "component",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InteractionStyle {
    #[default]
    Synchronous,
    Asynchronous,
}

impl InteractionStyle {
    pub fn tag(self) -> &'static str {
        match self {
            InteractionStyle::Synchronous => tags::SYNCHRONOUS,
            InteractionStyle::Asynchronous => tags::ASYNCHRONOUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RelationshipId(String);

impl RelationshipId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelationshipId {
    fn from(id: &str) -> Self {
        RelationshipId(id.to_string())
    }
}

/// A node in the architecture model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
}

impl Element {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_external(&self) -> bool {
        self.location == Location::External
    }
}

/// A directed, labeled edge between two elements.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_id: ElementId,
    pub destination_id: ElementId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub interaction_style: InteractionStyle,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Relationship {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether `id` is either end of this relationship.
    pub fn touches(&self, id: &ElementId) -> bool {
        self.source_id == *id || self.destination_id == *id
    }
}

/// Generate the next element ID by scanning existing elements.
/// Follows the pattern "element-{N}" with N incrementing.
pub fn next_element_id(elements: &[Element]) -> ElementId {
    let max = elements
        .iter()
        .filter_map(|e| {
            e.id.as_str()
                .strip_prefix("element-")
                .and_then(|s| s.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);
    ElementId(format!("element-{}", max + 1))
}

/// Generate the next relationship ID by scanning existing relationships.
pub fn next_relationship_id(relationships: &[Relationship]) -> RelationshipId {
    let max = relationships
        .iter()
        .filter_map(|r| {
            r.id.as_str()
                .strip_prefix("relationship-")
                .and_then(|s| s.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);
    RelationshipId(format!("relationship-{}", max + 1))
}

/// Append `tag` unless it is blank or already present.
/// Returns whether the tag list changed.
pub(crate) fn push_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Empty technology strings mean "no technology".
pub(crate) fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
