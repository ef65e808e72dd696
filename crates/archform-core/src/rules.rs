//! Non-fatal modeling checks.
//!
//! The builder only rejects what would make the workspace structurally
//! invalid. Everything here is advice: duplicated names, redundant edges
//! and elements that no diagram shows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ElementKind, Workspace};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HintSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    /// Element or relationship the hint is about.
    pub subject_id: String,
    pub message: String,
    pub severity: HintSeverity,
}

impl Hint {
    fn warning(subject_id: impl Into<String>, message: String) -> Self {
        Self {
            subject_id: subject_id.into(),
            message,
            severity: HintSeverity::Warning,
        }
    }

    fn info(subject_id: impl Into<String>, message: String) -> Self {
        Self {
            subject_id: subject_id.into(),
            message,
            severity: HintSeverity::Info,
        }
    }
}

/// Review a workspace against [`RULES`]. Warnings come before infos.
pub fn review(workspace: &Workspace) -> Vec<Hint> {
    let mut hints = Vec::new();
    duplicate_names(workspace, &mut hints);
    edges_to_own_children(workspace, &mut hints);
    children_of_external(workspace, &mut hints);
    unknown_embeds(workspace, &mut hints);
    unlabeled_relationships(workspace, &mut hints);
    elements_outside_views(workspace, &mut hints);
    hints.sort_by_key(|h| match h.severity {
        HintSeverity::Warning => 0,
        HintSeverity::Info => 1,
    });
    hints
}

// Rule 1
fn duplicate_names(workspace: &Workspace, hints: &mut Vec<Hint>) {
    let mut seen: HashMap<(ElementKind, Option<&str>, &str), &str> = HashMap::new();
    for element in workspace.elements() {
        let key = (
            element.kind,
            element.parent_id.as_ref().map(|p| p.as_str()),
            element.name.as_str(),
        );
        if let Some(first) = seen.get(&key) {
            hints.push(Hint::warning(
                element.id.as_str(),
                format!(
                    "{} '{}' has the same name as {}; one node per real thing",
                    element.kind, element.name, first
                ),
            ));
        } else {
            seen.insert(key, element.id.as_str());
        }
    }
}

// Rule 2
fn edges_to_own_children(workspace: &Workspace, hints: &mut Vec<Hint>) {
    for relationship in workspace.relationships() {
        let (source, destination) = (&relationship.source_id, &relationship.destination_id);
        if workspace.is_descendant(destination, source) || workspace.is_descendant(source, destination) {
            hints.push(Hint::warning(
                relationship.id.as_str(),
                format!(
                    "relationship '{}' connects an element with its own child; nesting already shows this",
                    relationship.label
                ),
            ));
        }
    }
}

// Rule 3
fn children_of_external(workspace: &Workspace, hints: &mut Vec<Hint>) {
    for system in workspace.software_systems().filter(|s| s.is_external()) {
        let count = workspace.children(&system.id).count();
        if count > 0 {
            hints.push(Hint::warning(
                system.id.as_str(),
                format!(
                    "external system '{}' has {} container(s); external systems are opaque",
                    system.name, count
                ),
            ));
        }
    }
}

// Rule 4
fn unknown_embeds(workspace: &Workspace, hints: &mut Vec<Hint>) {
    for section in workspace.documentation() {
        for key in section.embedded_views() {
            if workspace.view(key).is_none() {
                hints.push(Hint::warning(
                    section.element_id.as_str(),
                    format!("section '{}' embeds unknown view '{}'", section.title, key),
                ));
            }
        }
    }
}

// Rule 5
fn unlabeled_relationships(workspace: &Workspace, hints: &mut Vec<Hint>) {
    for relationship in workspace.relationships() {
        if relationship.label.trim().is_empty() {
            hints.push(Hint::info(
                relationship.id.as_str(),
                "relationship has no label".to_string(),
            ));
        }
    }
}

// Rule 6
fn elements_outside_views(workspace: &Workspace, hints: &mut Vec<Hint>) {
    if workspace.views().is_empty() {
        return;
    }
    for element in workspace.elements() {
        if !workspace.views().iter().any(|v| v.contains(&element.id)) {
            hints.push(Hint::info(
                element.id.as_str(),
                format!("{} '{}' is not shown in any view", element.kind, element.name),
            ));
        }
    }
}

/// Modeling rules the review hints refer to.
pub const RULES: &str = "\
1. One element per real thing. Two people, two software systems, or two siblings inside the same \
parent should not share a name; it usually means the same thing was modeled twice.\n\
2. Nesting is a relationship. A software system contains its containers and a container contains \
its components; do not also draw an edge between a parent and its own child.\n\
3. External systems are opaque. They are third-party services you do not control and have no \
containers of their own.\n\
4. Documentation embeds must resolve. Every `embed:` link in a documentation section names an \
existing view key.\n\
5. Relationships say what happens. Each edge carries a short label (\"Reads from\", \"Uses [HTTPS]\") \
and, when it matters, a technology.\n\
6. Every element earns a place on a diagram. Once views exist, an element shown in none of them is \
either missing from a view or does not belong in the model.";
