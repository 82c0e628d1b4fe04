//! Write path: bind layer properties to catalog styles.

use crate::error::AuditError;
use crate::host::DocumentWriter;
use crate::types::{ApplyOutcome, BulkOutcome, NodeId, StyleAction, StyleKind};

pub const APPLIED_MESSAGE: &str = "style applied";

/// Checks the target and sets one binding.
pub async fn try_apply_style<H: DocumentWriter>(
    host: &H,
    node_id: &NodeId,
    kind: StyleKind,
    style_id: &str,
) -> Result<(), AuditError> {
    let node = host
        .node(node_id)
        .await?
        .filter(|node| !node.node_type.is_page())
        .ok_or_else(|| AuditError::NodeNotFound(node_id.to_string()))?;

    let supported = match kind {
        StyleKind::Text => node.node_type.is_text(),
        StyleKind::Fill => node.node_type.supports_fills(),
        StyleKind::Stroke => node.node_type.supports_strokes(),
    };
    if !supported {
        return Err(AuditError::Inapplicable {
            kind: kind.to_string(),
            node_type: node.node_type.to_string(),
        });
    }

    host.set_style_binding(node_id, kind, style_id).await?;
    Ok(())
}

fn failure_message(err: &AuditError) -> String {
    match err {
        AuditError::NodeNotFound(_) => "target layer not found".to_string(),
        AuditError::Inapplicable { kind, .. } => {
            format!("this layer does not support a {kind} style")
        }
        other => other.to_string(),
    }
}

/// Applies one binding and reports the outcome instead of failing.
/// With `notify`, the outcome message is also sent to the user.
pub async fn apply_style<H: DocumentWriter>(
    host: &H,
    node_id: &NodeId,
    kind: StyleKind,
    style_id: &str,
    notify: bool,
) -> ApplyOutcome {
    let (ok, message) = match try_apply_style(host, node_id, kind, style_id).await {
        Ok(()) => {
            log::info!("bound {kind} style {style_id} to {node_id}");
            (true, APPLIED_MESSAGE.to_string())
        }
        Err(err) => {
            log::warn!("could not bind {kind} style {style_id} to {node_id}: {err}");
            (false, failure_message(&err))
        }
    };
    if notify {
        host.notify(&message);
    }
    ApplyOutcome {
        ok,
        node_id: node_id.clone(),
        kind,
        style_id: style_id.to_string(),
        message,
    }
}

/// Applies actions one at a time, in order, continuing past failures.
/// Only the summary is notified, not each action.
pub async fn apply_bulk<H: DocumentWriter>(
    host: &H,
    actions: &[StyleAction],
    notify: bool,
) -> BulkOutcome {
    let mut results = Vec::with_capacity(actions.len());
    for action in actions {
        results.push(apply_style(host, &action.node_id, action.kind, &action.style_id, false).await);
    }

    let summary = BulkOutcome::from_results(results);
    log::info!(
        "bulk apply: {}/{} action(s) succeeded",
        summary.success_actions,
        summary.total_actions
    );
    if notify {
        host.notify(&format!(
            "bulk apply: {} layer(s) / {} action(s) applied",
            summary.success_layer_count, summary.success_actions
        ));
    }
    summary
}
