//! Per-layer checks: unbound text, fill and stroke properties plus mixed
//! text runs, each paired with the best catalog candidate.

use serde_json::Value;

use crate::normalize;
use crate::signature::{has_mixed_runs, layer_text_signature, FillsMode};
use crate::style_index::{PaintStyleIndex, TextStyleIndex};
use crate::types::{
    NodeRecord, PaintStyle, ReasonItem, ReasonKind, Severity, StyleBinding, StyleKind,
    SuggestedStyle, TextSegment, TextStyle,
};

pub const NO_CANDIDATE_DETAIL: &str = "no style candidate available";

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    /// Flag text layers whose runs diverge; when off, such layers go through
    /// the missing-style check like any other.
    pub mixed_text_warning: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            mixed_text_warning: true,
        }
    }
}

/// Reasons and suggestions for one layer, in detection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerAnalysis {
    pub reasons: Vec<ReasonItem>,
    pub suggested_styles: Vec<SuggestedStyle>,
}

impl LayerAnalysis {
    fn flag(&mut self, kind: ReasonKind, severity: Severity) -> usize {
        self.reasons.push(ReasonItem::new(kind, severity));
        self.reasons.len() - 1
    }

    fn suggest(&mut self, reason: usize, kind: StyleKind, id: &str, name: &str) {
        self.reasons[reason].detail = Some(format!("candidate available ({kind} style: {name})"));
        self.suggested_styles.push(SuggestedStyle {
            kind,
            style_id: id.to_string(),
            style_name: name.to_string(),
        });
    }

    fn has_mixed_text(&self) -> bool {
        self.reasons
            .iter()
            .any(|r| r.kind == ReasonKind::MixedTextStyle)
    }

    /// Final severities: a reason with a suggested fix is a warning, one
    /// without any candidate is critical and says so.
    fn settle_severities(&mut self) {
        for reason in &mut self.reasons {
            let Some(kind) = reason.kind.style_kind() else {
                continue;
            };
            if self.suggested_styles.iter().any(|s| s.kind == kind) {
                reason.severity = Severity::Warning;
            } else {
                reason.severity = Severity::Critical;
                if reason.detail.as_deref().map_or(true, str::is_empty) {
                    reason.detail = Some(NO_CANDIDATE_DETAIL.to_string());
                }
            }
        }
    }
}

/// Runs the checks for one layer against a catalog indexed once per scan.
pub struct LayerAnalyzer<'a> {
    paint_index: PaintStyleIndex<'a>,
    text_index: TextStyleIndex<'a>,
    options: AnalyzerOptions,
}

impl<'a> LayerAnalyzer<'a> {
    pub fn new(
        paint_styles: &'a [PaintStyle],
        text_styles: &'a [TextStyle],
        options: AnalyzerOptions,
    ) -> Self {
        let paint_index = PaintStyleIndex::build(paint_styles);
        let text_index = TextStyleIndex::build(text_styles);
        log::debug!(
            "indexed {} paint key(s) and {} text style(s)",
            paint_index.len(),
            text_index.len()
        );
        Self {
            paint_index,
            text_index,
            options,
        }
    }

    /// `segments` are the layer's text runs (empty for non-text layers).
    pub fn analyze(&self, node: &NodeRecord, segments: &[TextSegment]) -> LayerAnalysis {
        let mut analysis = LayerAnalysis::default();

        if node.node_type.is_text() {
            self.check_text(node, segments, &mut analysis);
        }
        if !analysis.has_mixed_text() {
            if node.node_type.supports_fills() {
                self.check_paints(
                    node.fills.as_ref(),
                    &node.fill_style,
                    ReasonKind::MissingFillStyle,
                    &mut analysis,
                );
            }
            if node.node_type.supports_strokes() {
                self.check_paints(
                    node.strokes.as_ref(),
                    &node.stroke_style,
                    ReasonKind::MissingStrokeStyle,
                    &mut analysis,
                );
            }
        }

        analysis.settle_severities();
        analysis
    }

    fn check_text(&self, node: &NodeRecord, segments: &[TextSegment], out: &mut LayerAnalysis) {
        if self.options.mixed_text_warning && has_mixed_runs(segments) {
            out.flag(ReasonKind::MixedTextStyle, Severity::Warning);
            return;
        }
        if !node.text_style.is_unbound() {
            return;
        }

        let reason = out.flag(ReasonKind::MissingTextStyle, Severity::Critical);
        let direct = node.text.clone().unwrap_or_default();
        let fills = node.fills.as_ref();
        let full = layer_text_signature(&direct, fills, segments, FillsMode::Include);
        let without_fills = layer_text_signature(&direct, fills, segments, FillsMode::Ignore);
        match self.text_index.find(full.as_ref(), without_fills.as_ref()) {
            Some(style) => out.suggest(reason, StyleKind::Text, &style.id, &style.name),
            None => log::debug!("no text style candidate for {}", node.id),
        }
    }

    fn check_paints(
        &self,
        raw: Option<&Value>,
        binding: &StyleBinding,
        reason_kind: ReasonKind,
        out: &mut LayerAnalysis,
    ) {
        let Some(kind) = reason_kind.style_kind() else {
            return;
        };
        let Some(paints) = normalize::paint_list(raw) else {
            return;
        };
        if paints.is_empty() || !paints.has_color_paint() || !binding.is_missing() {
            return;
        }

        let reason = out.flag(reason_kind, Severity::Critical);
        if let Some(style) = self.paint_index.find(&paints) {
            out.suggest(reason, kind, &style.id, &style.name);
        }
    }
}
