use crate::{tags, Element, ElementKind, InteractionStyle, Workspace};

fn name_of<'a>(id: &'a crate::ElementId, workspace: &'a Workspace) -> &'a str {
    workspace
        .element(id)
        .map(|e| e.name.as_str())
        .unwrap_or(id.as_str())
}

fn prefix(element: &Element) -> &'static str {
    match element.kind {
        ElementKind::Person => "[P]",
        ElementKind::SoftwareSystem if element.is_external() => "[S!]",
        ElementKind::SoftwareSystem => "[S]",
        ElementKind::Container => "[C]",
        ElementKind::Component => "[K]",
    }
}

/// Convert a workspace to a compact text representation, one line per
/// element, relationship and view.
pub fn outline(workspace: &Workspace) -> String {
    let mut out = String::with_capacity(2048);

    out.push_str("WORKSPACE \"");
    out.push_str(workspace.name());
    out.push('"');
    if !workspace.description().is_empty() {
        out.push_str(" | ");
        out.push_str(workspace.description());
    }
    out.push('\n');

    out.push_str("ELEMENTS:\n");
    for element in workspace.elements() {
        let depth = ancestors(workspace, element);
        out.push_str(&"  ".repeat(depth));
        out.push_str(prefix(element));
        out.push(' ');
        out.push_str(element.id.as_str());
        out.push_str(" \"");
        out.push_str(&element.name);
        out.push('"');
        if let Some(tech) = &element.technology {
            out.push_str(" tech=");
            out.push_str(tech);
        }
        let custom: Vec<&str> = element
            .tags
            .iter()
            .map(String::as_str)
            .filter(|t| *t != tags::ELEMENT && *t != element.kind.tag())
            .collect();
        if !custom.is_empty() {
            out.push_str(" tags=");
            out.push_str(&custom.join(","));
        }
        if !element.description.is_empty() {
            out.push_str(" | \"");
            // Truncate long descriptions
            match element.description.char_indices().nth(80) {
                Some((cut, _)) => {
                    out.push_str(&element.description[..cut]);
                    out.push_str("...");
                }
                None => out.push_str(&element.description),
            }
            out.push('"');
        }
        out.push('\n');
    }

    out.push_str("RELATIONSHIPS:\n");
    for relationship in workspace.relationships() {
        out.push_str(relationship.id.as_str());
        out.push_str(" \"");
        out.push_str(name_of(&relationship.source_id, workspace));
        out.push_str("\" --[");
        out.push_str(&relationship.label);
        if let Some(t) = &relationship.technology {
            out.push('/');
            out.push_str(t);
        }
        out.push_str("]--");
        if relationship.interaction_style == InteractionStyle::Asynchronous {
            out.push('~');
        }
        out.push_str("> \"");
        out.push_str(name_of(&relationship.destination_id, workspace));
        out.push('"');
        out.push('\n');
    }

    if !workspace.views().is_empty() {
        out.push_str("VIEWS:\n");
        for view in workspace.views() {
            out.push_str("  ");
            out.push_str(&view.key);
            out.push_str(&format!(
                " ({:?} of \"{}\", {} elements, {} relationships)",
                view.kind,
                name_of(&view.scope_id, workspace),
                view.element_ids.len(),
                view.relationship_ids.len()
            ));
            out.push('\n');
        }
    }

    out
}

fn ancestors(workspace: &Workspace, element: &Element) -> usize {
    let mut depth = 0;
    let mut current = element.parent_id.as_ref();
    while let Some(parent) = current {
        depth += 1;
        if depth > 3 {
            break;
        }
        current = workspace.element(parent).and_then(|e| e.parent_id.as_ref());
    }
    depth
}
