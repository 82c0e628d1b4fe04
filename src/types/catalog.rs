//! Style catalog entries as exposed by the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::TextAttributes;

/// A named, reusable paint (color) style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintStyle {
    pub id: String,
    pub name: String,
    /// Raw paint list, normalized at index time.
    #[serde(default)]
    pub paints: Value,
}

/// A named, reusable text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub attrs: TextAttributes,
    /// Most hosts define no fills on text styles; such entries can only
    /// match with fills ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Value>,
}

/// Catalog entry summary offered to the UI for manual choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOption {
    pub id: String,
    pub name: String,
}

impl From<&PaintStyle> for StyleOption {
    fn from(style: &PaintStyle) -> Self {
        StyleOption {
            id: style.id.clone(),
            name: style.name.clone(),
        }
    }
}

impl From<&TextStyle> for StyleOption {
    fn from(style: &TextStyle) -> Self {
        StyleOption {
            id: style.id.clone(),
            name: style.name.clone(),
        }
    }
}
