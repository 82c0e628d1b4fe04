//! Boundary to the design tool that owns the document.
//!
//! The engine never owns nodes or styles. It reads snapshots through
//! [`DocumentReader`] and performs the few mutations it needs through
//! [`DocumentWriter`]. Every accessor may suspend; each call is expected to
//! return a coherent snapshot on its own.

#![allow(async_fn_in_trait)]

use thiserror::Error;

use crate::types::{NodeId, NodeRecord, PaintStyle, StyleKind, TextSegment, TextStyle};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("{kind} style binding is not supported on {node}")]
    Inapplicable { kind: StyleKind, node: String },

    #[error("host rejected the change: {0}")]
    Rejected(String),

    #[error("host error: {0}")]
    Other(String),
}

/// The active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: NodeId,
    pub name: String,
}

pub trait DocumentReader {
    /// Currently selected layers, in selection order.
    async fn selection(&self) -> Result<Vec<NodeId>, HostError>;

    async fn current_page(&self) -> Result<PageRef, HostError>;

    /// Every layer on the active page, depth-first pre-order, page excluded.
    async fn page_nodes(&self) -> Result<Vec<NodeId>, HostError>;

    /// All descendants of `id`, depth-first pre-order, `id` excluded.
    async fn descendants(&self, id: &NodeId) -> Result<Vec<NodeId>, HostError>;

    /// Property snapshot, or `None` when the id no longer resolves.
    async fn node(&self, id: &NodeId) -> Result<Option<NodeRecord>, HostError>;

    /// Styled runs of a text layer; empty for non-text layers.
    async fn text_segments(&self, id: &NodeId) -> Result<Vec<TextSegment>, HostError>;

    /// Paint styles in definition order.
    async fn paint_styles(&self) -> Result<Vec<PaintStyle>, HostError>;

    /// Text styles in definition order.
    async fn text_styles(&self) -> Result<Vec<TextStyle>, HostError>;
}

pub trait DocumentWriter: DocumentReader {
    async fn set_style_binding(
        &self,
        id: &NodeId,
        kind: StyleKind,
        style_id: &str,
    ) -> Result<(), HostError>;

    async fn set_current_page(&self, page: &NodeId) -> Result<(), HostError>;

    async fn set_selection(&self, ids: &[NodeId]) -> Result<(), HostError>;

    async fn scroll_into_view(&self, id: &NodeId) -> Result<(), HostError>;

    /// Fire-and-forget status message for the user.
    fn notify(&self, message: &str);
}
