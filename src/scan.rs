//! Scan orchestration: target selection, per-layer analysis, aggregation.

use std::cell::Cell;
use std::collections::HashSet;

use crate::analyzer::{AnalyzerOptions, LayerAnalyzer};
use crate::error::Result;
use crate::host::{DocumentReader, HostError};
use crate::types::{
    LayerResult, NodeId, NodeRecord, ReasonCounts, ReasonItem, ScanReport, ScanScope, Severity,
    StyleOption,
};

/// Layers a scan will visit, in traversal order, each exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTargets {
    pub nodes: Vec<NodeId>,
    pub scope: ScanScope,
}

/// The selection expanded to all descendants, or the whole page when
/// nothing is selected.
pub async fn collect_targets<H: DocumentReader>(host: &H) -> Result<ScanTargets> {
    let selection = host.selection().await?;
    if selection.is_empty() {
        return Ok(ScanTargets {
            nodes: host.page_nodes().await?,
            scope: ScanScope::Page,
        });
    }

    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for id in selection {
        if host.node(&id).await?.is_none() {
            log::warn!("selected layer {id} no longer exists; skipping");
            continue;
        }
        let descendants = match host.descendants(&id).await {
            Ok(descendants) => descendants,
            Err(HostError::NodeNotFound(_)) => {
                log::warn!("selected layer {id} vanished while collecting targets; skipping");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        for node in std::iter::once(id).chain(descendants) {
            if seen.insert(node.clone()) {
                nodes.push(node);
            }
        }
    }
    Ok(ScanTargets {
        nodes,
        scope: ScanScope::Selection,
    })
}

/// Breadcrumb names from the top-level layer down to `node`, page excluded.
/// Unnamed ancestors are skipped; an unnamed node shows its type.
pub async fn node_path<H: DocumentReader>(host: &H, node: &NodeRecord) -> Result<Vec<String>> {
    let mut parts = vec![node.label().to_string()];
    let mut parent = node.parent.clone();
    while let Some(id) = parent {
        let Some(record) = host.node(&id).await? else {
            break;
        };
        if record.node_type.is_page() {
            break;
        }
        if !record.name.is_empty() {
            parts.push(record.name.clone());
        }
        parent = record.parent;
    }
    parts.reverse();
    Ok(parts)
}

/// Stable sort into presentation order; ties keep detection order.
pub fn order_reasons(reasons: &mut [ReasonItem]) {
    reasons.sort_by_key(|reason| reason.kind);
}

/// Runs one full scan pass against the current document state.
pub async fn scan_layers<H: DocumentReader>(host: &H, options: AnalyzerOptions) -> Result<ScanReport> {
    let targets = collect_targets(host).await?;
    let (paint_styles, text_styles) =
        futures::try_join!(host.paint_styles(), host.text_styles())?;
    log::info!(
        "scanning {} layer(s) ({}) against {} paint / {} text style(s)",
        targets.nodes.len(),
        targets.scope.label(),
        paint_styles.len(),
        text_styles.len()
    );

    let analyzer = LayerAnalyzer::new(&paint_styles, &text_styles, options);
    let mut layers = Vec::new();
    let mut scanned_count = 0;
    let mut reason_counts = ReasonCounts::default();
    let mut critical_count = 0;
    let mut warning_count = 0;

    for id in &targets.nodes {
        let Some(node) = host.node(id).await? else {
            log::warn!("layer {id} disappeared during the scan; skipping");
            continue;
        };
        scanned_count += 1;

        let segments = if node.node_type.is_text() {
            host.text_segments(id).await?
        } else {
            Vec::new()
        };
        let mut analysis = analyzer.analyze(&node, &segments);
        if analysis.reasons.is_empty() {
            continue;
        }

        for reason in &analysis.reasons {
            reason_counts.record(reason.kind);
            match reason.severity {
                Severity::Critical => critical_count += 1,
                Severity::Warning => warning_count += 1,
            }
        }
        order_reasons(&mut analysis.reasons);
        log::debug!("{} ({}): {} reason(s)", node.name, id, analysis.reasons.len());

        layers.push(LayerResult {
            path: node_path(host, &node).await?,
            id: node.id,
            name: node.name,
            node_type: node.node_type,
            reasons: analysis.reasons,
            suggested_styles: analysis.suggested_styles,
        });
    }

    log::info!(
        "scan finished: {} of {} layer(s) flagged ({} critical, {} warning)",
        layers.len(),
        scanned_count,
        critical_count,
        warning_count
    );

    Ok(ScanReport {
        scanned_count,
        scan_scope: targets.scope,
        layers,
        text_reason_count: reason_counts.text(),
        color_reason_count: reason_counts.color(),
        reason_counts,
        critical_count,
        warning_count,
        text_style_options: text_styles.iter().map(StyleOption::from).collect(),
        paint_style_options: paint_styles.iter().map(StyleOption::from).collect(),
    })
}

/// Busy/pending flags that serialize scans on one orchestrator.
///
/// A trigger arriving while a scan runs does not start another traversal; it
/// marks one rescan as pending. Any number of such triggers collapse into a
/// single rescan that runs right after the current one.
#[derive(Debug, Default)]
pub struct ScanGate {
    busy: Cell<bool>,
    pending: Cell<bool>,
}

impl ScanGate {
    /// Claims the gate, or records a pending rescan when it is taken.
    pub fn try_begin(&self) -> bool {
        if self.busy.get() {
            self.pending.set(true);
            return false;
        }
        self.busy.set(true);
        true
    }

    /// Ends the current scan. Returns true when a pending rescan should run
    /// now; the gate then stays claimed for it.
    pub fn finish(&self) -> bool {
        if self.pending.replace(false) {
            return true;
        }
        self.busy.set(false);
        false
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReasonKind, Severity};

    #[test]
    fn reasons_sort_by_kind_keeping_detection_order() {
        let mut stroke = ReasonItem::new(ReasonKind::MissingStrokeStyle, Severity::Critical);
        stroke.detail = Some("first".into());
        let mut stroke_again = ReasonItem::new(ReasonKind::MissingStrokeStyle, Severity::Warning);
        stroke_again.detail = Some("second".into());
        let mut reasons = vec![
            stroke,
            ReasonItem::new(ReasonKind::MissingFillStyle, Severity::Critical),
            stroke_again,
            ReasonItem::new(ReasonKind::MissingTextStyle, Severity::Critical),
        ];
        order_reasons(&mut reasons);
        let kinds: Vec<_> = reasons.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReasonKind::MissingTextStyle,
                ReasonKind::MissingFillStyle,
                ReasonKind::MissingStrokeStyle,
                ReasonKind::MissingStrokeStyle,
            ]
        );
        assert_eq!(reasons[2].detail.as_deref(), Some("first"));
        assert_eq!(reasons[3].detail.as_deref(), Some("second"));
    }

    #[test]
    fn gate_coalesces_triggers_while_busy() {
        let gate = ScanGate::default();
        assert!(gate.try_begin());
        assert!(!gate.try_begin());
        assert!(!gate.try_begin());
        assert!(!gate.try_begin());
        assert!(gate.has_pending());

        // exactly one deferred rescan
        assert!(gate.finish());
        assert!(gate.is_busy());
        assert!(!gate.finish());
        assert!(!gate.is_busy());
        assert!(gate.try_begin());
    }

    #[test]
    fn gate_without_pending_releases() {
        let gate = ScanGate::default();
        assert!(gate.try_begin());
        assert!(!gate.finish());
        assert!(!gate.is_busy());
        assert!(!gate.has_pending());
    }
}
