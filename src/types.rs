//! Data types used throughout the auditor.
//!
//! This module is organized by domain:
//! - [`node`] - Layer handles, node types, bindings, raw text attributes
//! - [`catalog`] - Paint and text style catalog entries
//! - [`report`] - Reasons, layer results, scan report, apply outcomes

pub mod catalog;
pub mod node;
pub mod report;

// Re-export node types
pub use node::{
    is_mixed, NodeId, NodeRecord, NodeType, StyleBinding, StyleKind, TextAttributes, TextSegment,
    MIXED,
};

// Re-export catalog types
pub use catalog::{PaintStyle, StyleOption, TextStyle};

// Re-export report types
pub use report::{
    ApplyOutcome, BulkOutcome, LayerResult, ReasonCounts, ReasonItem, ReasonKind, ScanReport,
    ScanScope, Severity, StyleAction, SuggestedStyle,
};
