//! Comparable signatures built from normalized text properties.
//!
//! Two flavors exist:
//! - [`TextSignature`]: full fidelity, compared exactly against catalog
//!   text styles.
//! - [`CoreTextSignature`]: font family, weight, slant, size and resolved
//!   line height only, compared with small tolerances to decide whether the
//!   runs of one text layer really diverge.

use serde_json::Value;

use crate::font_meta::font_style_meta;
use crate::normalize::{self, LetterSpacing, LineHeight, TextCase, TextDecoration};
use crate::types::{TextAttributes, TextSegment};

pub const FONT_SIZE_TOLERANCE: f64 = 0.01;
pub const LINE_HEIGHT_TOLERANCE: f64 = 0.05;

/// Whether fills take part in a text signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillsMode {
    Include,
    Ignore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSignature {
    pub font_family: String,
    /// Raw, case-preserved style name.
    pub font_style: String,
    pub font_size: f64,
    pub line_height: LineHeight,
    pub letter_spacing: LetterSpacing,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
    pub paragraph_indent: f64,
    pub paragraph_spacing: f64,
    pub list_spacing: f64,
    /// Canonical paint list key; `None` when fills are ignored.
    pub fills: Option<String>,
}

/// Builds a full signature, or `None` when any required field is missing,
/// malformed, or mixed.
pub fn text_signature(
    attrs: &TextAttributes,
    fills: Option<&Value>,
    mode: FillsMode,
) -> Option<TextSignature> {
    let font = normalize::font_name(attrs.font_name.as_ref())?;
    let font_size = normalize::number(attrs.font_size.as_ref())?;
    let line_height = normalize::line_height(attrs.line_height.as_ref())?;
    let letter_spacing = normalize::letter_spacing(attrs.letter_spacing.as_ref())?;
    let fills = match mode {
        FillsMode::Ignore => None,
        FillsMode::Include => Some(normalize::paint_list(fills)?.key().to_string()),
    };

    Some(TextSignature {
        font_family: font.family,
        font_style: font.style,
        font_size,
        line_height,
        letter_spacing,
        text_case: normalize::text_case(attrs.text_case.as_ref()),
        text_decoration: normalize::text_decoration(attrs.text_decoration.as_ref()),
        paragraph_indent: normalize::number_or(attrs.paragraph_indent.as_ref(), 0.0),
        paragraph_spacing: normalize::number_or(attrs.paragraph_spacing.as_ref(), 0.0),
        list_spacing: normalize::number_or(attrs.list_spacing.as_ref(), 0.0),
        fills,
    })
}

/// Signature of a whole text layer.
///
/// The layer's direct properties are tried first. When they are mixed, the
/// runs are used instead, and only if every run yields the same signature.
pub fn layer_text_signature(
    direct: &TextAttributes,
    direct_fills: Option<&Value>,
    segments: &[TextSegment],
    mode: FillsMode,
) -> Option<TextSignature> {
    if let Some(sig) = text_signature(direct, direct_fills, mode) {
        return Some(sig);
    }

    let (first, rest) = segments.split_first()?;
    let base = text_signature(&first.attrs, first.fills.as_ref(), mode)?;
    for segment in rest {
        match text_signature(&segment.attrs, segment.fills.as_ref(), mode) {
            Some(sig) if sig == base => {}
            _ => return None,
        }
    }
    Some(base)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreTextSignature {
    /// Trimmed, lower-cased family.
    pub font_family: String,
    pub font_style_key: String,
    pub font_weight: Option<u16>,
    pub italic: bool,
    pub font_size: f64,
    /// `None` for automatic line height.
    pub line_height_px: Option<f64>,
}

impl CoreTextSignature {
    pub fn from_attrs(attrs: &TextAttributes) -> Option<Self> {
        let font = normalize::font_name(attrs.font_name.as_ref())?;
        let font_size = normalize::number(attrs.font_size.as_ref())?;
        let meta = font_style_meta(&font.style);

        Some(CoreTextSignature {
            font_family: font.family.trim().to_lowercase(),
            font_style_key: meta.style_key,
            font_weight: meta.weight,
            italic: meta.italic,
            font_size,
            line_height_px: normalize::line_height_px(attrs.line_height.as_ref(), font_size),
        })
    }

    /// Tolerant equality: sizes within [`FONT_SIZE_TOLERANCE`], resolved line
    /// heights within [`LINE_HEIGHT_TOLERANCE`]; weights compare numerically
    /// when both are known, style keys otherwise.
    pub fn matches(&self, other: &CoreTextSignature) -> bool {
        if self.font_family != other.font_family || self.italic != other.italic {
            return false;
        }
        if !within(self.font_size, other.font_size, FONT_SIZE_TOLERANCE) {
            return false;
        }
        match (self.line_height_px, other.line_height_px) {
            (None, None) => {}
            (Some(a), Some(b)) if within(a, b, LINE_HEIGHT_TOLERANCE) => {}
            _ => return false,
        }
        match (self.font_weight, other.font_weight) {
            (Some(a), Some(b)) => a == b,
            _ => self.font_style_key == other.font_style_key,
        }
    }
}

// Inputs are already rounded, so the difference is rounded too: 20.05 vs 20.0
// must count as exactly 0.05 apart.
fn within(a: f64, b: f64, tolerance: f64) -> bool {
    normalize::round((a - b).abs()) <= tolerance
}

/// True when a text layer's runs diverge beyond cosmetic jitter.
///
/// A single run is never mixed. When the first run cannot form a signature
/// there is no baseline and the layer is not flagged; any later run that
/// cannot form one, or differs from the baseline, flags the layer.
pub fn has_mixed_runs(segments: &[TextSegment]) -> bool {
    if segments.len() <= 1 {
        return false;
    }
    let Some(base) = CoreTextSignature::from_attrs(&segments[0].attrs) else {
        return false;
    };
    segments[1..].iter().any(|segment| {
        CoreTextSignature::from_attrs(&segment.attrs)
            .map(|current| !base.matches(&current))
            .unwrap_or(true)
    })
}
