use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::HostError;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Target layer not found: {0}")]
    NodeNotFound(String),

    #[error("Cannot apply a {kind} style to this layer ({node_type})")]
    Inapplicable { kind: String, node_type: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl AuditError {
    pub fn config(message: impl Into<String>) -> Self {
        AuditError::Config(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            AuditError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            AuditError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Document,
                e.to_string(),
                "Check that the document/actions file is valid JSON.",
            ),
            AuditError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Document,
                e.to_string(),
                "Check that the document file is valid YAML.",
            ),
            AuditError::Host(e) => ErrorPayload::new(
                ErrorCategory::Host,
                e.to_string(),
                "Re-run the scan; the document may have changed since the last report.",
            ),
            AuditError::NodeNotFound(id) => ErrorPayload::new(
                ErrorCategory::Host,
                format!("Target layer not found: {}", id),
                "Re-run the scan to refresh layer ids.",
            ),
            AuditError::Inapplicable { kind, node_type } => ErrorPayload::new(
                ErrorCategory::Host,
                format!("Cannot apply a {} style to a {} layer", kind, node_type),
                "Pick a style kind the layer supports (text styles need TEXT layers).",
            ),
            AuditError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Check flags/paths and the --config file.",
            ),
            AuditError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Document,
    Host,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
