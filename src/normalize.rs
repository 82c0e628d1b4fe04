//! Canonical forms for raw, possibly missing or mixed property values.
//!
//! Every function here is total: malformed input maps to a default or to
//! `None` ("unmatchable"), never to an error.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::is_mixed;

/// Decimal digits kept by [`round`].
pub const PRECISION: i32 = 4;

pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

/// Rounds to [`PRECISION`] decimal digits; idempotent.
pub fn round(value: f64) -> f64 {
    round_to(value, PRECISION)
}

/// A finite number rounded to the fixed precision, or `None`.
pub fn number(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(round)
}

pub fn number_or(value: Option<&Value>, default: f64) -> f64 {
    number(value).unwrap_or(default)
}

// ============================================================================
// Font name
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    pub style: String,
}

/// Both family and style must be non-empty strings.
pub fn font_name(value: Option<&Value>) -> Option<FontDescriptor> {
    let obj = value?.as_object()?;
    let family = obj.get("family").and_then(Value::as_str).unwrap_or("");
    let style = obj.get("style").and_then(Value::as_str).unwrap_or("");
    if family.is_empty() || style.is_empty() {
        return None;
    }
    Some(FontDescriptor {
        family: family.to_string(),
        style: style.to_string(),
    })
}

// ============================================================================
// Line height / letter spacing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Auto,
    Pixels(f64),
    Percent(f64),
}

impl fmt::Display for LineHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineHeight::Auto => f.write_str("AUTO"),
            LineHeight::Pixels(v) => write!(f, "PIXELS:{v}"),
            LineHeight::Percent(v) => write!(f, "PERCENT:{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LetterSpacing {
    Pixels(f64),
    Percent(f64),
}

impl Default for LetterSpacing {
    fn default() -> Self {
        LetterSpacing::Pixels(0.0)
    }
}

impl fmt::Display for LetterSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LetterSpacing::Pixels(v) => write!(f, "PIXELS:{v}"),
            LetterSpacing::Percent(v) => write!(f, "PERCENT:{v}"),
        }
    }
}

fn unit_and_value(value: &Value) -> Option<(&str, Option<&Value>)> {
    let obj = value.as_object()?;
    let unit = obj.get("unit").and_then(Value::as_str).unwrap_or("");
    Some((unit, obj.get("value")))
}

/// `None` only for the mixed sentinel; absent or malformed input is `AUTO`.
pub fn line_height(value: Option<&Value>) -> Option<LineHeight> {
    let Some(value) = value else {
        return Some(LineHeight::Auto);
    };
    if is_mixed(value) {
        return None;
    }
    let lh = match unit_and_value(value) {
        Some(("PIXELS", v)) => LineHeight::Pixels(number_or(v, 0.0)),
        Some(("PERCENT", v)) => LineHeight::Percent(number_or(v, 0.0)),
        _ => LineHeight::Auto,
    };
    Some(lh)
}

/// `None` only for the mixed sentinel; absent or malformed input is `PIXELS:0`.
pub fn letter_spacing(value: Option<&Value>) -> Option<LetterSpacing> {
    let Some(value) = value else {
        return Some(LetterSpacing::default());
    };
    if is_mixed(value) {
        return None;
    }
    let ls = match unit_and_value(value) {
        Some(("PERCENT", v)) => LetterSpacing::Percent(number_or(v, 0.0)),
        Some((_, v)) => LetterSpacing::Pixels(number_or(v, 0.0)),
        None => LetterSpacing::default(),
    };
    Some(ls)
}

/// Line height in pixels, resolving percentages against `font_size`.
/// `AUTO`, mixed, and malformed values have no pixel height.
pub fn line_height_px(value: Option<&Value>, font_size: f64) -> Option<f64> {
    let value = value?;
    if is_mixed(value) {
        return None;
    }
    match unit_and_value(value)? {
        ("PIXELS", v) => number(v),
        ("PERCENT", v) => number(v).map(|pct| round(font_size * pct / 100.0)),
        _ => None,
    }
}

// ============================================================================
// Text case / decoration
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

pub fn text_case(value: Option<&Value>) -> TextCase {
    match value.and_then(Value::as_str) {
        Some("UPPER") => TextCase::Upper,
        Some("LOWER") => TextCase::Lower,
        Some("TITLE") => TextCase::Title,
        Some("SMALL_CAPS") => TextCase::SmallCaps,
        Some("SMALL_CAPS_FORCED") => TextCase::SmallCapsForced,
        _ => TextCase::Original,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

pub fn text_decoration(value: Option<&Value>) -> TextDecoration {
    match value.and_then(Value::as_str) {
        Some("UNDERLINE") => TextDecoration::Underline,
        Some("STRIKETHROUGH") => TextDecoration::Strikethrough,
        _ => TextDecoration::None,
    }
}

// ============================================================================
// Paints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    Pattern,
    Other,
}

impl PaintKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SOLID" => PaintKind::Solid,
            "GRADIENT_LINEAR" => PaintKind::GradientLinear,
            "GRADIENT_RADIAL" => PaintKind::GradientRadial,
            "GRADIENT_ANGULAR" => PaintKind::GradientAngular,
            "GRADIENT_DIAMOND" => PaintKind::GradientDiamond,
            "IMAGE" => PaintKind::Image,
            "VIDEO" => PaintKind::Video,
            "PATTERN" => PaintKind::Pattern,
            _ => PaintKind::Other,
        }
    }

    pub fn is_gradient(self) -> bool {
        matches!(
            self,
            PaintKind::GradientLinear
                | PaintKind::GradientRadial
                | PaintKind::GradientAngular
                | PaintKind::GradientDiamond
        )
    }

    /// Solid colors and gradients; images and other media are not colors.
    pub fn is_color(self) -> bool {
        self == PaintKind::Solid || self.is_gradient()
    }
}

/// A paint reduced to the fields that define its appearance. Field order
/// fixes the canonical serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPaint {
    #[serde(rename = "type")]
    pub kind: PaintKind,
    pub visible: bool,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_stops: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_transform: Option<Value>,
}

impl NormalizedPaint {
    /// Visible, not fully transparent, and color-bearing.
    pub fn is_visible_color(&self) -> bool {
        self.visible && self.opacity > 0.0 && self.kind.is_color()
    }
}

/// Numbers become `f64` so `1` and `1.0` compare equal; object keys are
/// already sorted by `serde_json::Map`.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) => n.as_f64().map(Value::from).unwrap_or(Value::Null),
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), canonical(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

pub fn normalize_paint(value: &Value) -> Option<NormalizedPaint> {
    let obj = value.as_object()?;
    let kind = PaintKind::from_tag(obj.get("type").and_then(Value::as_str).unwrap_or(""));
    let payload = |key: &str| obj.get(key).map(canonical);

    let mut paint = NormalizedPaint {
        kind,
        visible: obj.get("visible") != Some(&Value::Bool(false)),
        opacity: obj
            .get("opacity")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(1.0),
        blend_mode: obj
            .get("blendMode")
            .and_then(Value::as_str)
            .map(str::to_string),
        color: None,
        gradient_stops: None,
        gradient_transform: None,
    };
    if kind == PaintKind::Solid {
        paint.color = payload("color");
    } else if kind.is_gradient() {
        paint.gradient_stops = payload("gradientStops");
        paint.gradient_transform = payload("gradientTransform");
    }
    Some(paint)
}

/// A normalized paint list and its canonical key. Lists compare element-wise
/// and in order through the key.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintList {
    paints: Vec<NormalizedPaint>,
    key: String,
}

impl PaintList {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.paints.is_empty()
    }

    pub fn has_color_paint(&self) -> bool {
        self.paints.iter().any(NormalizedPaint::is_visible_color)
    }
}

/// `None` for absent, mixed, non-list, or malformed-element input.
pub fn paint_list(value: Option<&Value>) -> Option<PaintList> {
    let items = value?.as_array()?;
    let paints = items
        .iter()
        .map(normalize_paint)
        .collect::<Option<Vec<_>>>()?;
    let key = serde_json::to_string(&paints).ok()?;
    Some(PaintList { paints, key })
}
