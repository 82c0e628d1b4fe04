//! Scan and apply result types.
//!
//! These types are the engine's only output artifacts:
//! - Per-layer reasons and suggested styles
//! - The aggregate scan report
//! - Outcomes of single and bulk style application

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::StyleOption;
use super::node::{NodeId, NodeType, StyleKind};

// ============================================================================
// Reasons
// ============================================================================

/// Why a layer was flagged. Variant order is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReasonKind {
    #[serde(rename = "missing text style")]
    MissingTextStyle,
    #[serde(rename = "mixed text style within one layer")]
    MixedTextStyle,
    #[serde(rename = "missing fill color style")]
    MissingFillStyle,
    #[serde(rename = "missing stroke color style")]
    MissingStrokeStyle,
}

impl ReasonKind {
    pub fn label(self) -> &'static str {
        match self {
            ReasonKind::MissingTextStyle => "missing text style",
            ReasonKind::MixedTextStyle => "mixed text style within one layer",
            ReasonKind::MissingFillStyle => "missing fill color style",
            ReasonKind::MissingStrokeStyle => "missing stroke color style",
        }
    }

    /// The binding a fix for this reason would set; mixed runs have none.
    pub fn style_kind(self) -> Option<StyleKind> {
        match self {
            ReasonKind::MissingTextStyle => Some(StyleKind::Text),
            ReasonKind::MixedTextStyle => None,
            ReasonKind::MissingFillStyle => Some(StyleKind::Fill),
            ReasonKind::MissingStrokeStyle => Some(StyleKind::Stroke),
        }
    }
}

/// Urgency of a reason.
///
/// After post-processing, `Critical` means no catalog candidate exists and the
/// layer needs manual attention; `Warning` means a one-click fix is suggested
/// (or the condition is cosmetic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonItem {
    #[serde(rename = "label")]
    pub kind: ReasonKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReasonItem {
    pub fn new(kind: ReasonKind, severity: Severity) -> Self {
        Self {
            kind,
            severity,
            detail: None,
        }
    }
}

/// A catalog style proposed as the fix for one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedStyle {
    pub kind: StyleKind,
    pub style_id: String,
    pub style_name: String,
}

// ============================================================================
// Scan report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerResult {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    /// Breadcrumb from the top-level layer down to this one; the page is excluded.
    pub path: Vec<String>,
    pub reasons: Vec<ReasonItem>,
    #[serde(default)]
    pub suggested_styles: Vec<SuggestedStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanScope {
    Selection,
    Page,
}

impl ScanScope {
    pub fn label(self) -> &'static str {
        match self {
            ScanScope::Selection => "selection",
            ScanScope::Page => "page",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonCounts {
    pub missing_text_style: usize,
    pub mixed_text_style: usize,
    pub missing_fill_style: usize,
    pub missing_stroke_style: usize,
}

impl ReasonCounts {
    pub fn record(&mut self, kind: ReasonKind) {
        match kind {
            ReasonKind::MissingTextStyle => self.missing_text_style += 1,
            ReasonKind::MixedTextStyle => self.mixed_text_style += 1,
            ReasonKind::MissingFillStyle => self.missing_fill_style += 1,
            ReasonKind::MissingStrokeStyle => self.missing_stroke_style += 1,
        }
    }

    pub fn text(&self) -> usize {
        self.missing_text_style + self.mixed_text_style
    }

    pub fn color(&self) -> usize {
        self.missing_fill_style + self.missing_stroke_style
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scanned_count: usize,
    pub scan_scope: ScanScope,
    /// Only layers with at least one reason.
    pub layers: Vec<LayerResult>,
    pub reason_counts: ReasonCounts,
    pub text_reason_count: usize,
    pub color_reason_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    #[serde(default)]
    pub text_style_options: Vec<StyleOption>,
    #[serde(default)]
    pub paint_style_options: Vec<StyleOption>,
}

// ============================================================================
// Apply outcomes
// ============================================================================

/// A user-confirmed request to bind one layer property to a catalog style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAction {
    pub node_id: NodeId,
    pub kind: StyleKind,
    pub style_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub ok: bool,
    pub node_id: NodeId,
    pub kind: StyleKind,
    pub style_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub total_actions: usize,
    pub success_actions: usize,
    pub failed_actions: usize,
    /// Distinct layers with at least one successful action.
    pub success_layer_count: usize,
    pub results: Vec<ApplyOutcome>,
}

impl BulkOutcome {
    /// Tallies per-action outcomes, kept in the order given.
    pub fn from_results(results: Vec<ApplyOutcome>) -> Self {
        let success_actions = results.iter().filter(|r| r.ok).count();
        let success_layer_count = results
            .iter()
            .filter(|r| r.ok)
            .map(|r| &r.node_id)
            .collect::<HashSet<_>>()
            .len();
        Self {
            total_actions: results.len(),
            success_actions,
            failed_actions: results.len() - success_actions,
            success_layer_count,
            results,
        }
    }
}
