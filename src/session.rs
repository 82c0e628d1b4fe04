//! Message-driven front end over the engine.
//!
//! A [`Session`] owns the per-orchestrator state (scan gate, auto-scan
//! toggle), turns [`UiMessage`]s into engine calls and posts [`UiEvent`]s
//! back through a [`UiSink`].

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerOptions;
use crate::apply::{apply_bulk, apply_style};
use crate::config::Config;
use crate::error::{ErrorPayload, Result};
use crate::host::DocumentWriter;
use crate::scan::{scan_layers, ScanGate};
use crate::types::{
    ApplyOutcome, BulkOutcome, NodeId, NodeRecord, ScanReport, StyleAction, StyleKind,
};

pub const TARGET_NOT_FOUND: &str = "target layer not found";

/// Commands from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UiMessage {
    Scan,
    Cancel,
    FocusNode {
        node_id: NodeId,
    },
    SetAutoScan {
        enabled: bool,
        /// Set on the first toggle after load; suppresses the immediate rescan.
        #[serde(default)]
        initial: bool,
    },
    ApplyStyle {
        node_id: NodeId,
        kind: StyleKind,
        style_id: String,
    },
    ApplyBulk {
        actions: Vec<StyleAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanTrigger {
    Manual,
    Auto,
}

/// Responses and pushes to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UiEvent {
    ScanResult {
        trigger: ScanTrigger,
        report: ScanReport,
    },
    AutoScanState {
        enabled: bool,
    },
    ApplyStyleResult {
        outcome: ApplyOutcome,
    },
    ApplyBulkResult {
        outcome: BulkOutcome,
    },
    Error {
        error: ErrorPayload,
    },
    /// A host notification relayed to a UI that cannot see the host.
    Notify {
        message: String,
    },
}

pub trait UiSink {
    fn post(&self, event: UiEvent);
}

/// Collects events in memory.
impl UiSink for RefCell<Vec<UiEvent>> {
    fn post(&self, event: UiEvent) {
        self.borrow_mut().push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Close,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub auto_scan: bool,
    pub notify: bool,
    pub analyzer: AnalyzerOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            auto_scan: config.auto_scan,
            notify: config.notify,
            analyzer: AnalyzerOptions {
                mixed_text_warning: config.mixed_text_warning,
            },
        }
    }
}

pub struct Session<H, U> {
    host: H,
    sink: U,
    gate: ScanGate,
    auto_scan: Cell<bool>,
    notify: bool,
    analyzer: AnalyzerOptions,
}

impl<H: DocumentWriter, U: UiSink> Session<H, U> {
    pub fn new(host: H, sink: U, options: SessionOptions) -> Self {
        Self {
            host,
            sink,
            gate: ScanGate::default(),
            auto_scan: Cell::new(options.auto_scan),
            notify: options.notify,
            analyzer: options.analyzer,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sink(&self) -> &U {
        &self.sink
    }

    pub fn auto_scan(&self) -> bool {
        self.auto_scan.get()
    }

    pub async fn handle(&self, message: UiMessage) -> SessionControl {
        match message {
            UiMessage::Scan => self.request_scan(ScanTrigger::Manual).await,
            UiMessage::Cancel => {
                log::info!("session closed by the UI");
                return SessionControl::Close;
            }
            UiMessage::FocusNode { node_id } => {
                if let Err(err) = self.focus(&node_id).await {
                    log::warn!("focus on {node_id} failed: {err}");
                    self.sink.post(UiEvent::Error {
                        error: err.to_payload(),
                    });
                }
            }
            UiMessage::SetAutoScan { enabled, initial } => {
                self.auto_scan.set(enabled);
                log::debug!("auto-scan {}", if enabled { "on" } else { "off" });
                self.sink.post(UiEvent::AutoScanState { enabled });
                if enabled && !initial {
                    self.request_scan(ScanTrigger::Auto).await;
                }
            }
            UiMessage::ApplyStyle {
                node_id,
                kind,
                style_id,
            } => {
                let outcome = apply_style(&self.host, &node_id, kind, &style_id, self.notify).await;
                self.sink.post(UiEvent::ApplyStyleResult { outcome });
            }
            UiMessage::ApplyBulk { actions } => {
                let outcome = apply_bulk(&self.host, &actions, self.notify).await;
                self.sink.post(UiEvent::ApplyBulkResult { outcome });
            }
        }
        SessionControl::Continue
    }

    /// Host hook for selection changes.
    pub async fn on_selection_change(&self) {
        if self.auto_scan.get() {
            self.request_scan(ScanTrigger::Auto).await;
        }
    }

    /// Runs a scan unless one is in flight, in which case a single rescan is
    /// queued behind it.
    pub async fn request_scan(&self, trigger: ScanTrigger) {
        if !self.gate.try_begin() {
            log::debug!("scan in progress; rescan deferred");
            return;
        }

        let mut trigger = trigger;
        loop {
            match scan_layers(&self.host, self.analyzer).await {
                Ok(report) => {
                    if trigger == ScanTrigger::Manual {
                        self.notify(&format!(
                            "scan complete ({}): {} layer(s)",
                            report.scan_scope.label(),
                            report.layers.len()
                        ));
                    }
                    self.sink.post(UiEvent::ScanResult { trigger, report });
                }
                Err(err) => {
                    log::error!("scan failed: {err}");
                    self.sink.post(UiEvent::Error {
                        error: err.to_payload(),
                    });
                }
            }
            if !self.gate.finish() {
                break;
            }
            trigger = ScanTrigger::Auto;
        }
    }

    async fn focus(&self, id: &NodeId) -> Result<()> {
        let node = match self.host.node(id).await? {
            Some(node) if !node.node_type.is_page() => node,
            _ => {
                self.notify(TARGET_NOT_FOUND);
                return Ok(());
            }
        };

        if let Some(page) = self.page_of(&node).await? {
            if page != self.host.current_page().await?.id {
                self.host.set_current_page(&page).await?;
            }
        }
        self.host.set_selection(std::slice::from_ref(id)).await?;
        self.host.scroll_into_view(id).await?;
        self.on_selection_change().await;
        Ok(())
    }

    async fn page_of(&self, node: &NodeRecord) -> Result<Option<NodeId>> {
        let mut parent = node.parent.clone();
        while let Some(id) = parent {
            let Some(record) = self.host.node(&id).await? else {
                return Ok(None);
            };
            if record.node_type.is_page() {
                return Ok(Some(record.id));
            }
            parent = record.parent;
        }
        Ok(None)
    }

    fn notify(&self, message: &str) {
        if self.notify {
            self.host.notify(message);
        }
    }
}
