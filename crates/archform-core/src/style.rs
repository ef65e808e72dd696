//! Tag-keyed presentation rules.
//!
//! Styles are stored in registration order. Resolving the style of an
//! element applies every rule whose tag the element carries, in that order,
//! so attributes set by later rules override earlier ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    #[default]
    Box,
    RoundedBox,
    Circle,
    Ellipse,
    Hexagon,
    Cylinder,
    Pipe,
    Person,
    Robot,
    Folder,
    WebBrowser,
    MobileDevicePortrait,
    MobileDeviceLandscape,
    Component,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Border {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Routing {
    #[default]
    Direct,
    Orthogonal,
    Curved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    /// Percentage, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

impl ElementStyle {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            shape: None,
            background: None,
            color: None,
            width: None,
            height: None,
            font_size: None,
            opacity: None,
            border: None,
        }
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn font_size(mut self, font_size: u32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = Some(opacity.min(100));
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStyle {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl RelationshipStyle {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            routing: None,
            color: None,
            thickness: None,
            dashed: None,
            font_size: None,
        }
    }

    pub fn routing(mut self, routing: Routing) -> Self {
        self.routing = Some(routing);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn thickness(mut self, thickness: u32) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn dashed(mut self, dashed: bool) -> Self {
        self.dashed = Some(dashed);
        self
    }

    pub fn font_size(mut self, font_size: u32) -> Self {
        self.font_size = Some(font_size);
        self
    }
}

/// A single style rule, as accepted by `WorkspaceBuilder::register_style`.
#[derive(Debug, Clone, PartialEq)]
pub enum Style {
    Element(ElementStyle),
    Relationship(RelationshipStyle),
}

impl From<ElementStyle> for Style {
    fn from(style: ElementStyle) -> Self {
        Style::Element(style)
    }
}

impl From<RelationshipStyle> for Style {
    fn from(style: RelationshipStyle) -> Self {
        Style::Relationship(style)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipStyle>,
}

impl Styles {
    pub fn add(&mut self, style: impl Into<Style>) {
        match style.into() {
            Style::Element(s) => self.elements.push(s),
            Style::Relationship(s) => self.relationships.push(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }

    /// Fold every element rule matching one of `tags` over the defaults.
    pub fn resolve_element(&self, tags: &[String]) -> ResolvedElementStyle {
        let mut resolved = ResolvedElementStyle::default();
        for style in self.elements.iter().filter(|s| tags.contains(&s.tag)) {
            if let Some(shape) = style.shape {
                resolved.shape = shape;
            }
            if let Some(background) = &style.background {
                resolved.background = background.clone();
            }
            if let Some(color) = &style.color {
                resolved.color = color.clone();
            }
            if let Some(width) = style.width {
                resolved.width = width;
            }
            if let Some(height) = style.height {
                resolved.height = height;
            }
            if let Some(font_size) = style.font_size {
                resolved.font_size = font_size;
            }
            if let Some(opacity) = style.opacity {
                resolved.opacity = opacity;
            }
            if let Some(border) = style.border {
                resolved.border = border;
            }
        }
        resolved
    }

    pub fn resolve_relationship(&self, tags: &[String]) -> ResolvedRelationshipStyle {
        let mut resolved = ResolvedRelationshipStyle::default();
        for style in self.relationships.iter().filter(|s| tags.contains(&s.tag)) {
            if let Some(routing) = style.routing {
                resolved.routing = routing;
            }
            if let Some(color) = &style.color {
                resolved.color = color.clone();
            }
            if let Some(thickness) = style.thickness {
                resolved.thickness = thickness;
            }
            if let Some(dashed) = style.dashed {
                resolved.dashed = dashed;
            }
            if let Some(font_size) = style.font_size {
                resolved.font_size = font_size;
            }
        }
        resolved
    }
}

/// The effective presentation of one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedElementStyle {
    pub shape: Shape,
    pub background: String,
    pub color: String,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub opacity: u8,
    pub border: Border,
}

impl Default for ResolvedElementStyle {
    fn default() -> Self {
        Self {
            shape: Shape::Box,
            background: "#dddddd".to_string(),
            color: "#000000".to_string(),
            width: 450,
            height: 300,
            font_size: 24,
            opacity: 100,
            border: Border::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRelationshipStyle {
    pub routing: Routing,
    pub color: String,
    pub thickness: u32,
    pub dashed: bool,
    pub font_size: u32,
}

impl Default for ResolvedRelationshipStyle {
    fn default() -> Self {
        Self {
            routing: Routing::Direct,
            color: "#707070".to_string(),
            thickness: 2,
            dashed: true,
            font_size: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn unmatched_tags_resolve_to_defaults() {
        let mut styles = Styles::default();
        styles.add(ElementStyle::new("Database").shape(Shape::Cylinder));
        let resolved = styles.resolve_element(&tags(&["Element", "Container"]));
        assert_eq!(resolved, ResolvedElementStyle::default());
    }

    #[test]
    fn later_rules_override_earlier_attributes() {
        let mut styles = Styles::default();
        styles.add(ElementStyle::new("Container").background("#facc2e"));
        styles.add(
            ElementStyle::new("Database")
                .background("#f5da81")
                .shape(Shape::Cylinder),
        );
        let resolved = styles.resolve_element(&tags(&["Element", "Container", "Database"]));
        assert_eq!(resolved.background, "#f5da81");
        assert_eq!(resolved.shape, Shape::Cylinder);
    }

    #[test]
    fn registration_order_wins_over_tag_order() {
        let mut styles = Styles::default();
        styles.add(ElementStyle::new("Microservice").shape(Shape::Hexagon));
        styles.add(ElementStyle::new("Container").shape(Shape::RoundedBox).width(300));
        // The element lists Microservice after Container, but the Container
        // rule was registered last.
        let resolved = styles.resolve_element(&tags(&["Container", "Microservice"]));
        assert_eq!(resolved.shape, Shape::RoundedBox);
        assert_eq!(resolved.width, 300);
    }

    #[test]
    fn same_tag_registered_twice_merges_attributes() {
        let mut styles = Styles::default();
        styles.add(ElementStyle::new("Person").color("#ffffff").shape(Shape::Person));
        styles.add(ElementStyle::new("Person").color("#000000"));
        let resolved = styles.resolve_element(&tags(&["Person"]));
        assert_eq!(resolved.color, "#000000");
        assert_eq!(resolved.shape, Shape::Person);
    }

    #[test]
    fn relationship_rules_apply_by_tag() {
        let mut styles = Styles::default();
        styles.add(RelationshipStyle::new("Relationship").routing(Routing::Direct).dashed(false));
        styles.add(RelationshipStyle::new("Asynchronous").dashed(true).thickness(4));
        let sync = styles.resolve_relationship(&tags(&["Relationship", "Synchronous"]));
        let not_sync = styles.resolve_relationship(&tags(&["Relationship", "Asynchronous"]));
        assert!(!sync.dashed);
        assert!(not_sync.dashed);
        assert_eq!(not_sync.thickness, 4);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(ElementStyle::new("x").opacity(250).opacity, Some(100));
    }
}
