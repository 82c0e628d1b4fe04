pub mod analyzer;
pub mod apply;
pub mod config;
pub mod document;
pub mod error;
pub mod font_meta;
pub mod host;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod scan;
pub mod session;
pub mod signature;
pub mod style_index;
pub mod types;

pub use analyzer::{AnalyzerOptions, LayerAnalysis, LayerAnalyzer, NO_CANDIDATE_DETAIL};
pub use apply::{apply_bulk, apply_style, try_apply_style, APPLIED_MESSAGE};
pub use config::{Config, FormatSetting, OutputSettings};
pub use document::{Document, DocumentFile, PageFile, SceneNode};
pub use error::{AuditError, ErrorCategory, ErrorPayload, Result};
pub use font_meta::{font_style_meta, FontStyleMeta};
pub use host::{DocumentReader, DocumentWriter, HostError, PageRef};
pub use logging::{init_logging, LoggingConfig};
pub use output::{ApplyOutput, AuditOutput, ErrorOutput, ScanOutput, AUDIT_OUTPUT_VERSION};
pub use scan::{collect_targets, node_path, order_reasons, scan_layers, ScanGate, ScanTargets};
pub use session::{
    ScanTrigger, Session, SessionControl, SessionOptions, UiEvent, UiMessage, UiSink,
    TARGET_NOT_FOUND,
};
pub use signature::{CoreTextSignature, FillsMode, TextSignature};
pub use style_index::{PaintStyleIndex, TextStyleIndex};
pub use types::{
    ApplyOutcome, BulkOutcome, LayerResult, NodeId, NodeRecord, NodeType, PaintStyle,
    ReasonCounts, ReasonItem, ReasonKind, ScanReport, ScanScope, Severity, StyleAction,
    StyleBinding, StyleKind, StyleOption, SuggestedStyle, TextAttributes, TextSegment, TextStyle,
};
