//! JSON envelopes written by the `dsa` binary.

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::types::{BulkOutcome, ScanReport};

pub const AUDIT_OUTPUT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuditOutput {
    Scan(ScanOutput),
    Apply(ApplyOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutput {
    pub version: String,
    pub document: String,
    pub report: ScanReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutput {
    pub version: String,
    pub document: String,
    pub outcome: BulkOutcome,
    /// Where the updated document was saved, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
