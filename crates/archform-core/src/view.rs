//! Named, scoped selections of the model.
//!
//! A view is anchored on a scope element: a software system for system
//! context and container views, a container for component views. An element
//! may join a view when its kind suits the view and it either lives inside
//! the scope or has a relationship with the scope or something inside it.

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::workspace::Workspace;
use crate::{Element, ElementId, ElementKind, RelationshipId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    SystemContext,
    Container,
    Component,
}

impl ViewKind {
    /// The kind of element a view of this kind is anchored on.
    pub fn scope_kind(self) -> ElementKind {
        match self {
            ViewKind::SystemContext | ViewKind::Container => ElementKind::SoftwareSystem,
            ViewKind::Component => ElementKind::Container,
        }
    }

    /// Whether elements of `kind` can be drawn in a view of this kind.
    pub fn allows(self, kind: ElementKind) -> bool {
        match self {
            ViewKind::SystemContext => {
                matches!(kind, ElementKind::Person | ElementKind::SoftwareSystem)
            }
            ViewKind::Container => kind != ElementKind::Component,
            ViewKind::Component => true,
        }
    }
}

/// Paper sizes at 300 dpi.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum PaperSize {
    #[serde(rename = "A5_Portrait")]
    A5Portrait,
    #[serde(rename = "A5_Landscape")]
    A5Landscape,
    #[serde(rename = "A4_Portrait")]
    A4Portrait,
    #[serde(rename = "A4_Landscape")]
    A4Landscape,
    #[serde(rename = "A3_Portrait")]
    A3Portrait,
    #[serde(rename = "A3_Landscape")]
    A3Landscape,
    #[serde(rename = "A2_Portrait")]
    A2Portrait,
    #[serde(rename = "A2_Landscape")]
    A2Landscape,
    #[serde(rename = "A1_Portrait")]
    A1Portrait,
    #[serde(rename = "A1_Landscape")]
    A1Landscape,
    #[serde(rename = "A0_Portrait")]
    A0Portrait,
    #[serde(rename = "A0_Landscape")]
    A0Landscape,
    #[serde(rename = "Letter_Portrait")]
    LetterPortrait,
    #[serde(rename = "Letter_Landscape")]
    LetterLandscape,
    #[serde(rename = "Legal_Portrait")]
    LegalPortrait,
    #[serde(rename = "Legal_Landscape")]
    LegalLandscape,
    #[serde(rename = "Slide_4_3")]
    Slide4x3,
    #[serde(rename = "Slide_16_9")]
    Slide16x9,
}

impl PaperSize {
    /// Width and height in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        use PaperSize::*;
        match self {
            A5Portrait => (1748, 2480),
            A5Landscape => (2480, 1748),
            A4Portrait => (2480, 3508),
            A4Landscape => (3508, 2480),
            A3Portrait => (3508, 4961),
            A3Landscape => (4961, 3508),
            A2Portrait => (4961, 7016),
            A2Landscape => (7016, 4961),
            A1Portrait => (7016, 9933),
            A1Landscape => (9933, 7016),
            A0Portrait => (9933, 14043),
            A0Landscape => (14043, 9933),
            LetterPortrait => (2550, 3300),
            LetterLandscape => (3300, 2550),
            LegalPortrait => (2550, 4200),
            LegalLandscape => (4200, 2550),
            Slide4x3 => (3306, 2480),
            Slide16x9 => (3508, 1973),
        }
    }

    pub fn is_landscape(self) -> bool {
        let (width, height) = self.dimensions();
        width > height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub key: String,
    pub kind: ViewKind,
    pub scope_id: ElementId,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
    /// Derived from `element_ids` when the workspace is finalized.
    #[serde(default)]
    pub relationship_ids: Vec<RelationshipId>,
}

impl View {
    pub fn contains(&self, id: &ElementId) -> bool {
        self.element_ids.contains(id)
    }
}

pub(crate) fn check_scope_kind(kind: ViewKind, scope: &Element) -> Result<(), ModelError> {
    let expected = kind.scope_kind();
    if scope.kind != expected {
        return Err(ModelError::WrongKind {
            element: scope.name.clone(),
            actual: scope.kind,
            expected,
        });
    }
    Ok(())
}

/// Whether `element` may appear in `view`.
pub(crate) fn admits(workspace: &Workspace, view: &View, element: &Element) -> bool {
    let scope = &view.scope_id;
    if !view.kind.allows(element.kind) {
        return false;
    }
    if element.id == *scope {
        // Only the system context view draws its own scope.
        return view.kind == ViewKind::SystemContext;
    }
    if workspace.is_descendant(scope, &element.id) {
        // Ancestors of the scope are implied by the view's boundary.
        return false;
    }
    if workspace.is_descendant(&element.id, scope) {
        return true;
    }
    workspace.relationships().iter().any(|r| {
        let other = if r.source_id == element.id {
            &r.destination_id
        } else if r.destination_id == element.id {
            &r.source_id
        } else {
            return false;
        };
        other == scope || workspace.is_descendant(other, scope)
    })
}

/// Mutable handle on one view of a workspace under construction.
pub struct ViewBuilder<'a> {
    workspace: &'a mut Workspace,
    index: usize,
}

impl<'a> ViewBuilder<'a> {
    pub(crate) fn new(workspace: &'a mut Workspace, index: usize) -> Self {
        Self { workspace, index }
    }

    fn view(&self) -> &View {
        &self.workspace.views[self.index]
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.workspace.views[self.index]
    }

    pub fn key(&self) -> &str {
        &self.view().key
    }

    pub fn kind(&self) -> ViewKind {
        self.view().kind
    }

    pub fn element_ids(&self) -> &[ElementId] {
        &self.view().element_ids
    }

    pub fn paper_size(&mut self, paper_size: PaperSize) -> &mut Self {
        self.view_mut().paper_size = Some(paper_size);
        self
    }

    /// Add one element, rejecting anything outside the view's scope.
    pub fn add(&mut self, id: &ElementId) -> Result<&mut Self, ModelError> {
        let element = self
            .workspace
            .element(id)
            .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
        if !admits(&*self.workspace, self.view(), element) {
            return Err(ModelError::OutOfScope {
                view: self.view().key.clone(),
                element: element.name.clone(),
            });
        }
        self.insert(id.clone());
        Ok(self)
    }

    pub fn remove(&mut self, id: &ElementId) -> &mut Self {
        self.view_mut().element_ids.retain(|e| e != id);
        self
    }

    pub fn add_all_people(&mut self) -> &mut Self {
        self.add_all_of(Some(ElementKind::Person))
    }

    pub fn add_all_software_systems(&mut self) -> &mut Self {
        self.add_all_of(Some(ElementKind::SoftwareSystem))
    }

    pub fn add_all_containers(&mut self) -> &mut Self {
        self.add_all_of(Some(ElementKind::Container))
    }

    pub fn add_all_components(&mut self) -> &mut Self {
        self.add_all_of(Some(ElementKind::Component))
    }

    /// Add every element the view admits.
    pub fn add_all_elements(&mut self) -> &mut Self {
        self.add_all_of(None)
    }

    fn add_all_of(&mut self, kind: Option<ElementKind>) -> &mut Self {
        let workspace: &Workspace = &*self.workspace;
        let view = &workspace.views[self.index];
        let ids: Vec<ElementId> = workspace
            .elements()
            .iter()
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .filter(|e| admits(workspace, view, e))
            .map(|e| e.id.clone())
            .collect();
        debug!(view = view.key.as_str(), count = ids.len(); "Adding elements to view");
        for id in ids {
            self.insert(id);
        }
        self
    }

    fn insert(&mut self, id: ElementId) {
        let view = self.view_mut();
        if !view.element_ids.contains(&id) {
            view.element_ids.push(id);
        }
    }
}
