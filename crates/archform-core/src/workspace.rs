use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::docs::DocumentationSection;
use crate::error::ModelError;
use crate::style::{ResolvedElementStyle, ResolvedRelationshipStyle, Styles};
use crate::view::{self, View};
use crate::{Element, ElementId, ElementKind, Relationship, RelationshipId};

/// The root aggregate: one architecture model plus its views, styles and
/// documentation. This is the unit handed to a sink.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) elements: Vec<Element>,
    #[serde(default)]
    pub(crate) relationships: Vec<Relationship>,
    #[serde(default)]
    pub(crate) views: Vec<View>,
    #[serde(default, skip_serializing_if = "Styles::is_empty")]
    pub(crate) styles: Styles,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) documentation: Vec<DocumentationSection>,
}

impl Workspace {
    pub(crate) fn empty(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            elements: Vec::new(),
            relationships: Vec::new(),
            views: Vec::new(),
            styles: Styles::default(),
            documentation: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn documentation(&self) -> &[DocumentationSection] {
        &self.documentation
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    pub fn relationship(&self, id: &RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == *id)
    }

    pub fn view(&self, key: &str) -> Option<&View> {
        self.views.iter().find(|v| v.key == key)
    }

    /// Resolve an element by name, first match in creation order.
    pub fn find_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }

    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(ElementKind::Person)
    }

    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(ElementKind::SoftwareSystem)
    }

    /// Direct children in the containment tree.
    pub fn children(&self, id: &ElementId) -> impl Iterator<Item = &Element> {
        let id = id.clone();
        self.elements
            .iter()
            .filter(move |e| e.parent_id.as_ref() == Some(&id))
    }

    /// All elements nested (at any depth) under `id`.
    pub fn descendants(&self, id: &ElementId) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            for child in self.children(&current) {
                if out.iter().all(|e: &&Element| e.id != child.id) {
                    stack.push(child.id.clone());
                    out.push(child);
                }
            }
        }
        out
    }

    /// Whether `ancestor` contains `id`, directly or transitively.
    pub fn is_descendant(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.element(id).and_then(|e| e.parent_id.as_ref());
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            if !seen.insert(parent) {
                return false;
            }
            current = self.element(parent).and_then(|e| e.parent_id.as_ref());
        }
        false
    }

    pub fn relationships_between<'a>(
        &'a self,
        source: &'a ElementId,
        destination: &'a ElementId,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.source_id == *source && r.destination_id == *destination)
    }

    /// Relationships whose both ends are shown in `view`.
    pub fn view_relationships<'a>(&'a self, view: &'a View) -> impl Iterator<Item = &'a Relationship> {
        self.relationships
            .iter()
            .filter(move |r| view.contains(&r.source_id) && view.contains(&r.destination_id))
    }

    pub fn element_style(&self, id: &ElementId) -> Option<ResolvedElementStyle> {
        self.element(id).map(|e| self.styles.resolve_element(&e.tags))
    }

    pub fn relationship_style(&self, id: &RelationshipId) -> Option<ResolvedRelationshipStyle> {
        self.relationship(id)
            .map(|r| self.styles.resolve_relationship(&r.tags))
    }

    /// Recompute each view's relationship list from its element set.
    pub(crate) fn refresh_view_relationships(&mut self) {
        let relationships = &self.relationships;
        for view in &mut self.views {
            view.relationship_ids = relationships
                .iter()
                .filter(|r| view.contains(&r.source_id) && view.contains(&r.destination_id))
                .map(|r| r.id.clone())
                .collect();
        }
    }

    /// Check every structural invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut ids = HashSet::new();
        for element in &self.elements {
            if !ids.insert(element.id.as_str()) {
                return Err(ModelError::DuplicateId(element.id.to_string()));
            }
        }

        for element in &self.elements {
            self.validate_containment(element)?;
        }

        let mut relationship_ids = HashSet::new();
        for relationship in &self.relationships {
            if !relationship_ids.insert(relationship.id.as_str()) {
                return Err(ModelError::DuplicateId(relationship.id.to_string()));
            }
            for end in [&relationship.source_id, &relationship.destination_id] {
                if !self.contains(end) {
                    return Err(ModelError::UnknownElement(end.clone()));
                }
            }
        }

        let mut keys = HashSet::new();
        for view in &self.views {
            if !keys.insert(view.key.as_str()) {
                return Err(ModelError::DuplicateViewKey(view.key.clone()));
            }
            let scope = self
                .element(&view.scope_id)
                .ok_or_else(|| ModelError::UnknownElement(view.scope_id.clone()))?;
            view::check_scope_kind(view.kind, scope)?;
            for id in &view.element_ids {
                let element = self
                    .element(id)
                    .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
                if !view::admits(self, view, element) {
                    return Err(ModelError::OutOfScope {
                        view: view.key.clone(),
                        element: element.name.clone(),
                    });
                }
            }
            for id in &view.relationship_ids {
                let relationship = self
                    .relationship(id)
                    .ok_or_else(|| ModelError::UnknownRelationship(id.clone()))?;
                if !view.contains(&relationship.source_id)
                    || !view.contains(&relationship.destination_id)
                {
                    return Err(ModelError::OutOfScope {
                        view: view.key.clone(),
                        element: relationship.label.clone(),
                    });
                }
            }
        }

        for section in &self.documentation {
            let element = self
                .element(&section.element_id)
                .ok_or_else(|| ModelError::UnknownElement(section.element_id.clone()))?;
            if element.kind != ElementKind::SoftwareSystem {
                return Err(ModelError::WrongKind {
                    element: element.name.clone(),
                    actual: element.kind,
                    expected: ElementKind::SoftwareSystem,
                });
            }
        }

        Ok(())
    }

    fn validate_containment(&self, element: &Element) -> Result<(), ModelError> {
        match (element.kind.parent_kind(), &element.parent_id) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(ModelError::TopLevelOnly {
                element: element.name.clone(),
                kind: element.kind,
            }),
            (Some(expected), None) => Err(ModelError::MissingParent {
                element: element.name.clone(),
                kind: element.kind,
                expected,
            }),
            (Some(expected), Some(parent_id)) => {
                if self.is_descendant(parent_id, &element.id) || *parent_id == element.id {
                    return Err(ModelError::CyclicContainment(element.id.clone()));
                }
                let parent = self
                    .element(parent_id)
                    .ok_or_else(|| ModelError::UnknownElement(parent_id.clone()))?;
                if parent.kind != expected {
                    return Err(ModelError::InvalidParent {
                        parent: parent.name.clone(),
                        actual: parent.kind,
                        child: element.kind,
                        expected,
                    });
                }
                Ok(())
            }
        }
    }

    // --- Export ---

    /// Compact one-line-per-item text rendering.
    pub fn outline(&self) -> String {
        crate::outline::outline(self)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a workspace document and check it is structurally valid.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let workspace: Workspace = serde_json::from_str(raw)?;
        workspace.validate()?;
        Ok(workspace)
    }

    /// JSON schema of the workspace document.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Workspace)).unwrap_or_default()
    }
}
