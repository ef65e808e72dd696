//! Single-pass construction of a [`Workspace`].
//!
//! The builder validates every call eagerly: a call that would break an
//! invariant returns a [`ModelError`] and leaves the workspace untouched.

use log::{debug, info, trace};

use crate::docs::{DocumentationSection, Format, CONTEXT_SECTION};
use crate::error::ModelError;
use crate::style::{ElementStyle, RelationshipStyle, Style};
use crate::view::{self, View, ViewBuilder, ViewKind};
use crate::workspace::Workspace;
use crate::{
    next_element_id, next_relationship_id, non_empty, push_tag, tags, Element, ElementId,
    ElementKind, InteractionStyle, Location, Relationship, RelationshipId,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderOptions {
    /// Reject a second person or software system with the same name, and
    /// a second container or component with the same name under one parent.
    pub unique_names: bool,
}

#[derive(Debug)]
pub struct WorkspaceBuilder {
    workspace: Workspace,
    options: BuilderOptions,
}

impl WorkspaceBuilder {
    pub fn new(name: &str, description: &str) -> Self {
        Self::with_options(name, description, BuilderOptions::default())
    }

    pub fn with_options(name: &str, description: &str, options: BuilderOptions) -> Self {
        Self {
            workspace: Workspace::empty(name, description),
            options,
        }
    }

    /// Read access to the model built so far.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    // --- Elements ---

    pub fn add_person(&mut self, name: &str, description: &str) -> Result<ElementId, ModelError> {
        self.check_unique_name(ElementKind::Person, None, name)?;
        Ok(self.insert_element(
            ElementKind::Person,
            None,
            Location::Internal,
            name,
            description,
            None,
        ))
    }

    pub fn add_software_system(
        &mut self,
        location: Location,
        name: &str,
        description: &str,
    ) -> Result<ElementId, ModelError> {
        self.check_unique_name(ElementKind::SoftwareSystem, None, name)?;
        Ok(self.insert_element(
            ElementKind::SoftwareSystem,
            None,
            location,
            name,
            description,
            None,
        ))
    }

    pub fn add_container(
        &mut self,
        system: &ElementId,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<ElementId, ModelError> {
        self.check_parent(ElementKind::Container, system)?;
        self.check_unique_name(ElementKind::Container, Some(system), name)?;
        Ok(self.insert_element(
            ElementKind::Container,
            Some(system.clone()),
            Location::Internal,
            name,
            description,
            non_empty(technology),
        ))
    }

    pub fn add_component(
        &mut self,
        container: &ElementId,
        name: &str,
        description: &str,
    ) -> Result<ElementId, ModelError> {
        self.add_component_with_technology(container, name, description, "")
    }

    pub fn add_component_with_technology(
        &mut self,
        container: &ElementId,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<ElementId, ModelError> {
        self.check_parent(ElementKind::Component, container)?;
        self.check_unique_name(ElementKind::Component, Some(container), name)?;
        Ok(self.insert_element(
            ElementKind::Component,
            Some(container.clone()),
            Location::Internal,
            name,
            description,
            non_empty(technology),
        ))
    }

    fn check_parent(&self, child: ElementKind, parent_id: &ElementId) -> Result<(), ModelError> {
        let parent = self
            .workspace
            .element(parent_id)
            .ok_or_else(|| ModelError::UnknownElement(parent_id.clone()))?;
        let expected = child
            .parent_kind()
            .unwrap_or(ElementKind::SoftwareSystem);
        if parent.kind != expected {
            return Err(ModelError::InvalidParent {
                parent: parent.name.clone(),
                actual: parent.kind,
                child,
                expected,
            });
        }
        Ok(())
    }

    fn check_unique_name(
        &self,
        kind: ElementKind,
        parent: Option<&ElementId>,
        name: &str,
    ) -> Result<(), ModelError> {
        if !self.options.unique_names {
            return Ok(());
        }
        let taken = self
            .workspace
            .elements_of_kind(kind)
            .any(|e| e.name == name && e.parent_id.as_ref() == parent);
        if taken {
            return Err(ModelError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert_element(
        &mut self,
        kind: ElementKind,
        parent_id: Option<ElementId>,
        location: Location,
        name: &str,
        description: &str,
        technology: Option<String>,
    ) -> ElementId {
        let id = next_element_id(&self.workspace.elements);
        debug!(id = id.as_str(), kind:? = kind, name = name; "Adding element");
        self.workspace.elements.push(Element {
            id: id.clone(),
            kind,
            name: name.to_string(),
            description: description.to_string(),
            location,
            technology,
            tags: vec![tags::ELEMENT.to_string(), kind.tag().to_string()],
            parent_id,
        });
        id
    }

    // --- Relationships ---

    /// `source` uses `destination`, synchronously and with no technology.
    pub fn uses(
        &mut self,
        source: &ElementId,
        destination: &ElementId,
        label: &str,
    ) -> Result<RelationshipId, ModelError> {
        self.uses_with(source, destination, label, None, InteractionStyle::Synchronous)
    }

    pub fn uses_with(
        &mut self,
        source: &ElementId,
        destination: &ElementId,
        label: &str,
        technology: Option<&str>,
        interaction_style: InteractionStyle,
    ) -> Result<RelationshipId, ModelError> {
        let from = self
            .workspace
            .element(source)
            .ok_or_else(|| ModelError::UnknownElement(source.clone()))?;
        let to = self
            .workspace
            .element(destination)
            .ok_or_else(|| ModelError::UnknownElement(destination.clone()))?;

        if self
            .workspace
            .relationships_between(source, destination)
            .any(|r| r.label == label)
        {
            return Err(ModelError::DuplicateRelationship {
                from: from.name.clone(),
                to: to.name.clone(),
                label: label.to_string(),
            });
        }

        let id = next_relationship_id(&self.workspace.relationships);
        debug!(
            id = id.as_str(),
            source = source.as_str(),
            destination = destination.as_str(),
            label = label;
            "Adding relationship"
        );
        self.workspace.relationships.push(Relationship {
            id: id.clone(),
            source_id: source.clone(),
            destination_id: destination.clone(),
            label: label.to_string(),
            technology: technology.and_then(non_empty),
            interaction_style,
            tags: vec![
                tags::RELATIONSHIP.to_string(),
                interaction_style.tag().to_string(),
            ],
        });
        Ok(id)
    }

    // --- Tags ---

    /// Tag an element. Adding a tag it already carries is a no-op.
    pub fn add_tag(&mut self, id: &ElementId, tag: &str) -> Result<(), ModelError> {
        let element = self
            .workspace
            .element_mut(id)
            .ok_or_else(|| ModelError::UnknownElement(id.clone()))?;
        if push_tag(&mut element.tags, tag) {
            trace!(id = id.as_str(), tag = tag; "Tagged element");
        }
        Ok(())
    }

    pub fn add_tags(&mut self, id: &ElementId, tags: &[&str]) -> Result<(), ModelError> {
        for tag in tags {
            self.add_tag(id, tag)?;
        }
        Ok(())
    }

    pub fn add_relationship_tag(
        &mut self,
        id: &RelationshipId,
        tag: &str,
    ) -> Result<(), ModelError> {
        let relationship = self
            .workspace
            .relationships
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| ModelError::UnknownRelationship(id.clone()))?;
        push_tag(&mut relationship.tags, tag);
        Ok(())
    }

    // --- Views ---

    /// Create a view anchored on `scope`. System context views start out
    /// containing their scope.
    pub fn create_view(
        &mut self,
        kind: ViewKind,
        scope: &ElementId,
        key: &str,
        description: &str,
    ) -> Result<ViewBuilder<'_>, ModelError> {
        if self.workspace.view(key).is_some() {
            return Err(ModelError::DuplicateViewKey(key.to_string()));
        }
        let scope_element = self
            .workspace
            .element(scope)
            .ok_or_else(|| ModelError::UnknownElement(scope.clone()))?;
        view::check_scope_kind(kind, scope_element)?;

        let mut element_ids = Vec::new();
        if kind == ViewKind::SystemContext {
            element_ids.push(scope.clone());
        }
        debug!(key = key, kind:? = kind, scope = scope.as_str(); "Creating view");
        self.workspace.views.push(View {
            key: key.to_string(),
            kind,
            scope_id: scope.clone(),
            description: description.to_string(),
            paper_size: None,
            element_ids,
            relationship_ids: Vec::new(),
        });
        let index = self.workspace.views.len() - 1;
        Ok(ViewBuilder::new(&mut self.workspace, index))
    }

    pub fn create_system_context_view(
        &mut self,
        system: &ElementId,
        key: &str,
        description: &str,
    ) -> Result<ViewBuilder<'_>, ModelError> {
        self.create_view(ViewKind::SystemContext, system, key, description)
    }

    pub fn create_container_view(
        &mut self,
        system: &ElementId,
        key: &str,
        description: &str,
    ) -> Result<ViewBuilder<'_>, ModelError> {
        self.create_view(ViewKind::Container, system, key, description)
    }

    pub fn create_component_view(
        &mut self,
        container: &ElementId,
        key: &str,
        description: &str,
    ) -> Result<ViewBuilder<'_>, ModelError> {
        self.create_view(ViewKind::Component, container, key, description)
    }

    /// Reopen a view created earlier.
    pub fn view(&mut self, key: &str) -> Result<ViewBuilder<'_>, ModelError> {
        let index = self
            .workspace
            .views
            .iter()
            .position(|v| v.key == key)
            .ok_or_else(|| ModelError::UnknownView(key.to_string()))?;
        Ok(ViewBuilder::new(&mut self.workspace, index))
    }

    // --- Styles ---

    /// Append a style rule. The tag does not need to be in use yet.
    pub fn register_style(&mut self, style: impl Into<Style>) {
        self.workspace.styles.add(style);
    }

    pub fn add_element_style(&mut self, style: ElementStyle) {
        self.register_style(style);
    }

    pub fn add_relationship_style(&mut self, style: RelationshipStyle) {
        self.register_style(style);
    }

    // --- Documentation ---

    pub fn add_documentation_section(
        &mut self,
        system: &ElementId,
        title: &str,
        format: Format,
        content: &str,
    ) -> Result<(), ModelError> {
        let element = self
            .workspace
            .element(system)
            .ok_or_else(|| ModelError::UnknownElement(system.clone()))?;
        if element.kind != ElementKind::SoftwareSystem {
            return Err(ModelError::WrongKind {
                element: element.name.clone(),
                actual: element.kind,
                expected: ElementKind::SoftwareSystem,
            });
        }
        if self
            .workspace
            .documentation
            .iter()
            .any(|s| s.element_id == *system && s.title == title)
        {
            return Err(ModelError::DuplicateSection {
                element: element.name.clone(),
                title: title.to_string(),
            });
        }
        let order = self.workspace.documentation.len() as u32 + 1;
        self.workspace.documentation.push(DocumentationSection {
            element_id: system.clone(),
            title: title.to_string(),
            format,
            content: content.to_string(),
            order,
        });
        Ok(())
    }

    pub fn add_context_section(
        &mut self,
        system: &ElementId,
        format: Format,
        content: &str,
    ) -> Result<(), ModelError> {
        self.add_documentation_section(system, CONTEXT_SECTION, format, content)
    }

    // --- Finalize ---

    /// Freeze the model and hand it over for persistence or upload.
    pub fn finalize(mut self) -> Workspace {
        self.workspace.refresh_view_relationships();
        info!(
            workspace = self.workspace.name.as_str(),
            elements = self.workspace.elements.len(),
            relationships = self.workspace.relationships.len(),
            views = self.workspace.views.len();
            "Workspace finalized"
        );
        self.workspace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Shape;
    use crate::view::PaperSize;

    fn alice_uses_s() -> (WorkspaceBuilder, ElementId, ElementId) {
        let mut builder = WorkspaceBuilder::new("Test", "");
        let alice = builder.add_person("Alice", "A user").unwrap();
        let s = builder
            .add_software_system(Location::Internal, "S", "The system")
            .unwrap();
        (builder, alice, s)
    }

    #[test]
    fn added_elements_are_contained() {
        let (mut builder, alice, s) = alice_uses_s();
        let web = builder.add_container(&s, "Web", "", "Rust").unwrap();
        let api = builder.add_component(&web, "Api", "").unwrap();
        for id in [&alice, &s, &web, &api] {
            assert!(builder.workspace().contains(id));
        }
        assert_eq!(builder.workspace().element(&api).unwrap().parent_id, Some(web));
    }

    #[test]
    fn person_uses_system_scenario() {
        let (mut builder, alice, s) = alice_uses_s();
        builder.uses(&alice, &s, "Uses").unwrap();
        let workspace = builder.finalize();

        assert_eq!(workspace.elements().len(), 2);
        assert_eq!(workspace.relationships().len(), 1);
        let relationship = &workspace.relationships()[0];
        assert_eq!(relationship.label, "Uses");
        assert_eq!(relationship.source_id, alice);
        assert_eq!(relationship.destination_id, s);
        assert_eq!(relationship.interaction_style, InteractionStyle::Synchronous);
    }

    #[test]
    fn container_under_person_is_rejected() {
        let (mut builder, alice, _) = alice_uses_s();
        let err = builder.add_container(&alice, "X", "", "").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidParent {
                actual: ElementKind::Person,
                expected: ElementKind::SoftwareSystem,
                ..
            }
        ));
        assert_eq!(builder.workspace().elements().len(), 2);
    }

    #[test]
    fn component_requires_container_parent() {
        let (mut builder, _, s) = alice_uses_s();
        let err = builder.add_component(&s, "C", "").unwrap_err();
        assert!(matches!(err, ModelError::InvalidParent { expected: ElementKind::Container, .. }));
    }

    #[test]
    fn unknown_parent_is_reported() {
        let (mut builder, _, _) = alice_uses_s();
        let ghost = ElementId::from("element-99");
        let err = builder.add_container(&ghost, "X", "", "").unwrap_err();
        assert!(matches!(err, ModelError::UnknownElement(id) if id == ghost));
    }

    #[test]
    fn uses_rejects_unknown_endpoints() {
        let (mut builder, alice, _) = alice_uses_s();
        let ghost = ElementId::from("element-42");
        assert!(matches!(
            builder.uses(&alice, &ghost, "Uses"),
            Err(ModelError::UnknownElement(_))
        ));
        assert!(matches!(
            builder.uses(&ghost, &alice, "Uses"),
            Err(ModelError::UnknownElement(_))
        ));
        assert!(builder.workspace().relationships().is_empty());
    }

    #[test]
    fn duplicate_relationship_is_rejected_but_other_labels_are_not() {
        let (mut builder, alice, s) = alice_uses_s();
        builder.uses(&alice, &s, "Uses").unwrap();
        assert!(matches!(
            builder.uses(&alice, &s, "Uses"),
            Err(ModelError::DuplicateRelationship { .. })
        ));
        builder.uses(&alice, &s, "Administers").unwrap();
        builder.uses(&s, &alice, "Uses").unwrap();
        assert_eq!(builder.workspace().relationships().len(), 3);
    }

    #[test]
    fn relationships_carry_style_and_default_tags() {
        let (mut builder, _, s) = alice_uses_s();
        let bus = builder.add_container(&s, "Bus", "", "RabbitMQ").unwrap();
        let api = builder.add_container(&s, "Api", "", "").unwrap();
        let id = builder
            .uses_with(&api, &bus, "Publishes to", Some(""), InteractionStyle::Asynchronous)
            .unwrap();
        let relationship = builder.workspace().relationship(&id).unwrap();
        assert_eq!(relationship.technology, None);
        assert_eq!(relationship.tags, vec!["Relationship", "Asynchronous"]);
    }

    #[test]
    fn tags_are_idempotent() {
        let (mut builder, _, s) = alice_uses_s();
        builder.add_tag(&s, "Microservice").unwrap();
        builder.add_tag(&s, "Microservice").unwrap();
        let tags = &builder.workspace().element(&s).unwrap().tags;
        assert_eq!(tags.iter().filter(|t| *t == "Microservice").count(), 1);
        assert_eq!(tags, &vec!["Element", "Software System", "Microservice"]);
    }

    #[test]
    fn duplicate_names_are_allowed_by_default() {
        let mut builder = WorkspaceBuilder::new("Test", "");
        builder.add_person("Alice", "").unwrap();
        assert!(builder.add_person("Alice", "").is_ok());
    }

    #[test]
    fn duplicate_names_rejected_when_unique_names_enabled() {
        let options = BuilderOptions { unique_names: true };
        let mut builder = WorkspaceBuilder::with_options("Test", "", options);
        builder.add_person("Alice", "").unwrap();
        assert!(matches!(
            builder.add_person("Alice", ""),
            Err(ModelError::DuplicateName { kind: ElementKind::Person, .. })
        ));
        // A software system may share a person's name.
        let a = builder.add_software_system(Location::Internal, "Alice", "").unwrap();
        let b = builder.add_software_system(Location::Internal, "B", "").unwrap();
        builder.add_container(&a, "Web", "", "").unwrap();
        // Same container name under another system is fine.
        builder.add_container(&b, "Web", "", "").unwrap();
        assert!(builder.add_container(&a, "Web", "", "").is_err());
    }

    #[test]
    fn view_scope_must_match_kind() {
        let (mut builder, alice, s) = alice_uses_s();
        assert!(matches!(
            builder.create_view(ViewKind::SystemContext, &alice, "ctx", ""),
            Err(ModelError::WrongKind { .. })
        ));
        assert!(matches!(
            builder.create_component_view(&s, "cmp", ""),
            Err(ModelError::WrongKind { .. })
        ));
        assert!(builder.workspace().views().is_empty());
    }

    #[test]
    fn view_keys_are_unique() {
        let (mut builder, _, s) = alice_uses_s();
        builder.create_system_context_view(&s, "ctx", "").unwrap();
        assert!(matches!(
            builder.create_container_view(&s, "ctx", ""),
            Err(ModelError::DuplicateViewKey(_))
        ));
        assert!(builder.view("ctx").is_ok());
        assert!(matches!(builder.view("nope"), Err(ModelError::UnknownView(_))));
    }

    #[test]
    fn view_add_enforces_scope() {
        let mut builder = WorkspaceBuilder::new("Test", "");
        let alice = builder.add_person("Alice", "").unwrap();
        let bob = builder.add_person("Bob", "").unwrap();
        let s = builder.add_software_system(Location::Internal, "S", "").unwrap();
        let other = builder.add_software_system(Location::External, "Other", "").unwrap();
        let web = builder.add_container(&s, "Web", "", "").unwrap();
        builder.uses(&alice, &web, "Uses").unwrap();
        builder.uses(&s, &other, "Calls").unwrap();

        let mut view = builder.create_container_view(&s, "containers", "").unwrap();
        view.add(&alice).unwrap().add(&web).unwrap().add(&other).unwrap();
        assert!(matches!(view.add(&bob), Err(ModelError::OutOfScope { .. })));
        // A container view never shows its own scope.
        assert!(matches!(view.add(&s), Err(ModelError::OutOfScope { .. })));
        assert_eq!(view.element_ids(), &[alice, web, other]);
    }

    #[test]
    fn system_context_view_rejects_containers() {
        let (mut builder, alice, s) = alice_uses_s();
        let web = builder.add_container(&s, "Web", "", "").unwrap();
        builder.uses(&alice, &s, "Uses").unwrap();
        let mut view = builder.create_system_context_view(&s, "ctx", "").unwrap();
        assert!(matches!(view.add(&web), Err(ModelError::OutOfScope { .. })));
        view.add(&alice).unwrap();
        assert_eq!(view.element_ids(), &[s, alice]);
    }

    #[test]
    fn add_all_only_adds_in_scope_elements() {
        let mut builder = WorkspaceBuilder::new("Test", "");
        let s = builder.add_software_system(Location::Internal, "S", "").unwrap();
        let related = builder.add_software_system(Location::External, "Related", "").unwrap();
        let unrelated = builder.add_software_system(Location::External, "Unrelated", "").unwrap();
        builder.uses(&related, &s, "Calls").unwrap();

        builder
            .create_system_context_view(&s, "ctx", "")
            .unwrap()
            .add_all_software_systems()
            .paper_size(PaperSize::A4Landscape);

        let workspace = builder.finalize();
        let view = workspace.view("ctx").unwrap();
        assert!(view.contains(&s));
        assert!(view.contains(&related));
        assert!(!view.contains(&unrelated));
        assert_eq!(view.paper_size, Some(PaperSize::A4Landscape));
        assert_eq!(view.relationship_ids.len(), 1);
    }

    #[test]
    fn component_view_takes_related_containers_but_not_its_scope() {
        let mut builder = WorkspaceBuilder::new("Test", "");
        let s = builder.add_software_system(Location::Internal, "S", "").unwrap();
        let api = builder.add_container(&s, "Api", "", "").unwrap();
        let db = builder.add_container(&s, "Db", "", "").unwrap();
        let controller = builder.add_component(&api, "Controller", "").unwrap();
        builder.uses(&controller, &db, "Reads").unwrap();

        let mut view = builder.create_component_view(&api, "components", "").unwrap();
        view.add_all_components().add(&db).unwrap();
        assert!(view.add(&api).is_err());
        assert!(view.add(&s).is_err());
        assert_eq!(view.element_ids(), &[controller, db]);
    }

    #[test]
    fn styles_resolve_through_workspace() {
        let (mut builder, alice, s) = alice_uses_s();
        builder.add_tag(&s, "Database").unwrap();
        builder.register_style(ElementStyle::new(tags::SOFTWARE_SYSTEM).background("#1168bd"));
        builder.add_element_style(ElementStyle::new("Database").shape(Shape::Cylinder));
        let workspace = builder.finalize();

        let style = workspace.element_style(&s).unwrap();
        assert_eq!(style.background, "#1168bd");
        assert_eq!(style.shape, Shape::Cylinder);
        assert_eq!(workspace.element_style(&alice).unwrap().shape, Shape::Box);
    }

    #[test]
    fn context_section_needs_software_system() {
        let (mut builder, alice, s) = alice_uses_s();
        builder.add_context_section(&s, Format::Markdown, "Context").unwrap();
        assert!(matches!(
            builder.add_context_section(&s, Format::Markdown, "Again"),
            Err(ModelError::DuplicateSection { .. })
        ));
        assert!(matches!(
            builder.add_context_section(&alice, Format::Markdown, "x"),
            Err(ModelError::WrongKind { .. })
        ));
        let workspace = builder.finalize();
        assert_eq!(workspace.documentation().len(), 1);
        assert_eq!(workspace.documentation()[0].title, "Context");
    }
}
