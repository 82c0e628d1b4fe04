//! Per-scan lookup structures over the style catalog.
//!
//! Both indexes are rebuilt for every scan because the catalog may change
//! between scans.

use std::collections::HashMap;

use crate::normalize::{self, PaintList};
use crate::signature::{text_signature, FillsMode, TextSignature};
use crate::types::{PaintStyle, TextStyle};

/// Canonical paint-list key to the first catalog style with that key.
#[derive(Debug, Default)]
pub struct PaintStyleIndex<'a> {
    by_key: HashMap<String, &'a PaintStyle>,
}

impl<'a> PaintStyleIndex<'a> {
    pub fn build(styles: &'a [PaintStyle]) -> Self {
        let mut by_key = HashMap::with_capacity(styles.len());
        for style in styles {
            let Some(paints) = normalize::paint_list(Some(&style.paints)) else {
                log::debug!("paint style {:?} has no usable paint list", style.name);
                continue;
            };
            by_key.entry(paints.key().to_string()).or_insert(style);
        }
        Self { by_key }
    }

    pub fn find(&self, paints: &PaintList) -> Option<&'a PaintStyle> {
        self.by_key.get(paints.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[derive(Debug)]
struct TextStyleEntry<'a> {
    style: &'a TextStyle,
    full: Option<TextSignature>,
    without_fills: Option<TextSignature>,
}

/// Catalog text styles with both signature flavors precomputed.
#[derive(Debug, Default)]
pub struct TextStyleIndex<'a> {
    entries: Vec<TextStyleEntry<'a>>,
}

impl<'a> TextStyleIndex<'a> {
    pub fn build(styles: &'a [TextStyle]) -> Self {
        let entries = styles
            .iter()
            .map(|style| TextStyleEntry {
                style,
                full: text_signature(&style.attrs, style.fills.as_ref(), FillsMode::Include),
                without_fills: text_signature(&style.attrs, None, FillsMode::Ignore),
            })
            .collect();
        Self { entries }
    }

    /// Finds the catalog style for a layer's two signatures.
    ///
    /// The first full (fills included) match in catalog order wins outright.
    /// Otherwise the first fills-ignored match is returned, but only after the
    /// whole catalog has been checked for a full match.
    pub fn find(
        &self,
        full: Option<&TextSignature>,
        without_fills: Option<&TextSignature>,
    ) -> Option<&'a TextStyle> {
        if full.is_none() && without_fills.is_none() {
            return None;
        }

        let mut fallback: Option<&'a TextStyle> = None;
        for entry in &self.entries {
            if let (Some(node), Some(style)) = (full, entry.full.as_ref()) {
                if node == style {
                    return Some(entry.style);
                }
            }
            if fallback.is_none() {
                if let (Some(node), Some(style)) = (without_fills, entry.without_fills.as_ref()) {
                    if node == style {
                        fallback = Some(entry.style);
                    }
                }
            }
        }
        fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextAttributes;
    use serde_json::{json, Value};

    fn paint_style(id: &str, paints: Value) -> PaintStyle {
        PaintStyle {
            id: id.into(),
            name: format!("Style {id}"),
            paints,
        }
    }

    fn text_style(id: &str, size: f64, fills: Option<Value>) -> TextStyle {
        TextStyle {
            id: id.into(),
            name: format!("Text {id}"),
            attrs: attrs(size),
            fills,
        }
    }

    fn attrs(size: f64) -> TextAttributes {
        TextAttributes {
            font_name: Some(json!({"family": "Inter", "style": "Regular"})),
            font_size: Some(json!(size)),
            ..Default::default()
        }
    }

    fn red() -> Value {
        json!([{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0}}])
    }

    fn black() -> Value {
        json!([{"type": "SOLID", "color": {"r": 0, "g": 0, "b": 0}}])
    }

    #[test]
    fn paint_index_first_seen_wins() {
        let styles = vec![
            paint_style("a", red()),
            paint_style("b", red()),
            paint_style("c", black()),
            paint_style("broken", json!("nope")),
        ];
        let index = PaintStyleIndex::build(&styles);
        assert_eq!(index.len(), 2);
        let paints = normalize::paint_list(Some(&red())).unwrap();
        assert_eq!(index.find(&paints).map(|s| s.id.as_str()), Some("a"));
        let none = normalize::paint_list(Some(&json!([]))).unwrap();
        assert!(index.find(&none).is_none());
    }

    #[test]
    fn later_full_match_preempts_earlier_fallback() {
        let styles = vec![
            text_style("fallback", 16.0, Some(black())),
            text_style("exact", 16.0, Some(red())),
        ];
        let index = TextStyleIndex::build(&styles);
        let full = text_signature(&attrs(16.0), Some(&red()), FillsMode::Include);
        let loose = text_signature(&attrs(16.0), None, FillsMode::Ignore);
        let found = index.find(full.as_ref(), loose.as_ref()).unwrap();
        assert_eq!(found.id, "exact");
    }

    #[test]
    fn first_fallback_wins_without_full_match() {
        let styles = vec![
            text_style("first", 16.0, None),
            text_style("second", 16.0, Some(black())),
            text_style("other-size", 18.0, Some(red())),
        ];
        let index = TextStyleIndex::build(&styles);
        let full = text_signature(&attrs(16.0), Some(&red()), FillsMode::Include);
        let loose = text_signature(&attrs(16.0), None, FillsMode::Ignore);
        let found = index.find(full.as_ref(), loose.as_ref()).unwrap();
        assert_eq!(found.id, "first");
    }

    #[test]
    fn first_defined_full_match_wins() {
        let styles = vec![
            text_style("one", 16.0, Some(red())),
            text_style("two", 16.0, Some(red())),
        ];
        let index = TextStyleIndex::build(&styles);
        let full = text_signature(&attrs(16.0), Some(&red()), FillsMode::Include);
        assert_eq!(index.find(full.as_ref(), None).unwrap().id, "one");
    }

    #[test]
    fn no_signatures_means_no_candidate() {
        let styles = vec![text_style("one", 16.0, None)];
        let index = TextStyleIndex::build(&styles);
        assert!(index.find(None, None).is_none());
    }
}
