use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ElementId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    #[default]
    Markdown,
    AsciiDoc,
}

/// Title used by `WorkspaceBuilder::add_context_section`.
pub const CONTEXT_SECTION: &str = "Context";

/// A block of written documentation attached to a software system.
/// Content may embed diagrams by view key, e.g. `![](embed:SystemContext)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationSection {
    pub element_id: ElementId,
    pub title: String,
    #[serde(default)]
    pub format: Format,
    pub content: String,
    pub order: u32,
}

impl DocumentationSection {
    /// View keys referenced through `embed:` links in the content.
    pub fn embedded_views(&self) -> Vec<&str> {
        self.content
            .match_indices("(embed:")
            .filter_map(|(start, marker)| {
                let rest = &self.content[start + marker.len()..];
                let end = rest.find(')')?;
                let key = rest[..end].trim();
                (!key.is_empty()).then_some(key)
            })
            .collect()
    }
}
