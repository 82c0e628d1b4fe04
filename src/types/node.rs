//! Layer snapshot types.
//!
//! Nodes are owned by the host document; the engine only ever sees them as
//! [`NodeId`] handles and read-only [`NodeRecord`] snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker the host uses for a property that differs across sub-ranges.
pub const MIXED: &str = "$mixed";

/// Returns true when a raw property value is the mixed sentinel.
pub fn is_mixed(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == MIXED)
}

/// Opaque node handle resolved through the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

/// Structural node type (PAGE, FRAME, TEXT, RECTANGLE, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Page,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Rectangle,
    Ellipse,
    Polygon,
    Star,
    Vector,
    Line,
    BooleanOperation,
    Text,
    Slice,
    #[serde(other)]
    Other,
}

impl NodeType {
    pub fn is_text(self) -> bool {
        matches!(self, NodeType::Text)
    }

    pub fn is_page(self) -> bool {
        matches!(self, NodeType::Page)
    }

    /// Whether the layer has a fill list and a fill style binding.
    pub fn supports_fills(self) -> bool {
        !matches!(
            self,
            NodeType::Page | NodeType::Group | NodeType::Slice | NodeType::Other
        )
    }

    /// Whether the layer has a stroke list and a stroke style binding.
    pub fn supports_strokes(self) -> bool {
        self.supports_fills() && !matches!(self, NodeType::Section)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Page => "PAGE",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Polygon => "POLYGON",
            NodeType::Star => "STAR",
            NodeType::Vector => "VECTOR",
            NodeType::Line => "LINE",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Other => "OTHER",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which style binding of a layer an action or suggestion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Text,
    Fill,
    Stroke,
}

impl StyleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Text => "text",
            StyleKind::Fill => "fill",
            StyleKind::Stroke => "stroke",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a layer's binding to a catalog style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StyleBinding {
    #[default]
    Unbound,
    Mixed,
    Bound(String),
}

impl StyleBinding {
    /// Empty or absent ids are unbound; the mixed sentinel is mixed.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => StyleBinding::Unbound,
            Some(MIXED) => StyleBinding::Mixed,
            Some(id) => StyleBinding::Bound(id.to_string()),
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, StyleBinding::Unbound)
    }

    /// Unbound or mixed: no single catalog style covers the property.
    pub fn is_missing(&self) -> bool {
        !matches!(self, StyleBinding::Bound(_))
    }
}

/// Raw typography attributes shared by text layers, text runs, and catalog
/// text styles. Values stay raw so malformed or mixed input reaches the
/// normalizer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_case: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_indent: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_spacing: Option<Value>,
}

/// One contiguous run of a text layer sharing low-level style properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(flatten)]
    pub attrs: TextAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Value>,
}

/// Read-only snapshot of one layer's audit-relevant properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub parent: Option<NodeId>,
    pub fills: Option<Value>,
    pub strokes: Option<Value>,
    pub fill_style: StyleBinding,
    pub stroke_style: StyleBinding,
    pub text_style: StyleBinding,
    /// Direct text attributes; only present on text layers.
    pub text: Option<TextAttributes>,
}

impl NodeRecord {
    /// Display label used in breadcrumbs: the name, or the type when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.node_type.as_str()
        } else {
            &self.name
        }
    }
}
