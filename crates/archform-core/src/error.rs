//! Construction-time validation failures.
//!
//! Every error is raised eagerly by the call that violates an invariant and
//! indicates a mistake in the code building the workspace; none of them are
//! retryable.

use thiserror::Error;

use crate::{ElementId, ElementKind, RelationshipId};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: ElementKind, name: String },

    #[error("'{parent}' is a {actual}, but a {child} must be placed inside a {expected}")]
    InvalidParent {
        parent: String,
        actual: ElementKind,
        child: ElementKind,
        expected: ElementKind,
    },

    #[error("{kind} '{element}' must be placed inside a {expected}")]
    MissingParent {
        element: String,
        kind: ElementKind,
        expected: ElementKind,
    },

    #[error("{kind} '{element}' must be top-level")]
    TopLevelOnly { element: String, kind: ElementKind },

    #[error("'{element}' is a {actual}, expected a {expected}")]
    WrongKind {
        element: String,
        actual: ElementKind,
        expected: ElementKind,
    },

    #[error("element '{0}' is not registered in this workspace")]
    UnknownElement(ElementId),

    #[error("relationship '{0}' is not registered in this workspace")]
    UnknownRelationship(RelationshipId),

    #[error("'{element}' is outside the scope of view '{view}'")]
    OutOfScope { view: String, element: String },

    #[error("relationship '{label}' from '{from}' to '{to}' already exists")]
    DuplicateRelationship {
        from: String,
        to: String,
        label: String,
    },

    #[error("a view with key '{0}' already exists")]
    DuplicateViewKey(String),

    #[error("no view with key '{0}'")]
    UnknownView(String),

    #[error("a '{title}' section for '{element}' already exists")]
    DuplicateSection { element: String, title: String },

    #[error("containment of element '{0}' forms a cycle")]
    CyclicContainment(ElementId),

    #[error("id '{0}' is used more than once")]
    DuplicateId(String),

    #[error("invalid workspace document: {0}")]
    Json(#[from] serde_json::Error),
}
