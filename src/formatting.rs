use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dsa_lib::{AuditError, AuditOutput, ErrorOutput, Severity, AUDIT_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Writes an envelope. `pretty` renders the human summary only on a TTY
/// with no `--output`; elsewhere it falls back to indented JSON.
pub fn write_output(
    body: &AuditOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let human = format == OutputFormat::Pretty && output.is_none() && io::stdout().is_terminal();
    if human {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }
    write_json(body, format == OutputFormat::Pretty, output.as_deref())
}

fn write_json(
    body: &AuditOutput,
    indent: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = if indent {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{content}"),
    }
    Ok(())
}

/// Emits the error envelope and returns the fatal exit code.
pub fn render_error(err: AuditError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    log::error!("{err}");
    let payload = err.to_payload();
    let body = AuditOutput::Error(ErrorOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        message: Some(payload.message.clone()),
        error: payload,
    });

    if let Err(write_err) = write_output(&body, format, output.clone()) {
        eprintln!("Failed to write error output: {write_err}");
        if output.is_some() {
            // fall back to stdout
            let _ = write_output(&body, format, None);
        }
    }
    ExitCode::from(2)
}

pub fn format_pretty(body: &AuditOutput, colorize: bool) -> String {
    let severity = |s: Severity| match s {
        Severity::Critical => tint("critical", Tone::Red, colorize),
        Severity::Warning => tint("warning", Tone::Yellow, colorize),
    };

    match body {
        AuditOutput::Scan(out) => {
            let mut buf = String::new();
            let report = &out.report;
            let header = tint("[SCAN]", Tone::Cyan, colorize);
            writeln!(
                buf,
                "{} {} of {} layer(s) flagged ({})",
                header,
                report.layers.len(),
                report.scanned_count,
                report.scan_scope.label()
            )
            .ok();
            writeln!(
                buf,
                "Critical: {}  Warning: {}  Text: {}  Color: {}",
                report.critical_count,
                report.warning_count,
                report.text_reason_count,
                report.color_reason_count
            )
            .ok();
            for layer in &report.layers {
                writeln!(buf, "- {} ({}, {})", layer.path.join(" / "), layer.node_type, layer.id)
                    .ok();
                for reason in &layer.reasons {
                    let detail = reason
                        .detail
                        .as_deref()
                        .map(|d| format!(": {d}"))
                        .unwrap_or_default();
                    writeln!(
                        buf,
                        "    [{}] {}{}",
                        severity(reason.severity),
                        reason.kind.label(),
                        detail
                    )
                    .ok();
                }
                for suggestion in &layer.suggested_styles {
                    writeln!(
                        buf,
                        "    suggest {} -> {} ({})",
                        suggestion.kind, suggestion.style_name, suggestion.style_id
                    )
                    .ok();
                }
            }
            buf
        }
        AuditOutput::Apply(out) => {
            let mut buf = String::new();
            let outcome = &out.outcome;
            let tone = if outcome.failed_actions == 0 {
                Tone::Green
            } else {
                Tone::Yellow
            };
            let header = tint("[APPLY]", tone, colorize);
            writeln!(
                buf,
                "{} {}/{} action(s) applied across {} layer(s)",
                header, outcome.success_actions, outcome.total_actions, outcome.success_layer_count
            )
            .ok();
            let failures: Vec<_> = outcome.results.iter().filter(|r| !r.ok).collect();
            if !failures.is_empty() {
                writeln!(buf, "Failed:").ok();
                for failure in failures {
                    writeln!(
                        buf,
                        "- {} {} {}: {}",
                        failure.node_id, failure.kind, failure.style_id, failure.message
                    )
                    .ok();
                }
            }
            if let Some(path) = &out.written_to {
                writeln!(buf, "Saved: {path}").ok();
            }
            buf
        }
        AuditOutput::Error(out) => {
            let mut buf = String::new();
            let header = tint("[ERROR]", Tone::Red, colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Red,
    Yellow,
    Green,
    Cyan,
}

impl Tone {
    fn ansi(self) -> u8 {
        match self {
            Tone::Red => 31,
            Tone::Green => 32,
            Tone::Yellow => 33,
            Tone::Cyan => 36,
        }
    }
}

fn tint(text: &str, tone: Tone, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{text}\x1b[0m", tone.ansi())
    } else {
        text.to_string()
    }
}

/// Exit code 1 only when asked to fail on critical findings.
pub fn exit_code_for_scan(critical_count: usize, fail_on_critical: bool) -> ExitCode {
    if fail_on_critical && critical_count > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

pub fn exit_code_for_apply(failed_actions: usize) -> ExitCode {
    if failed_actions == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsa_lib::{
        ApplyOutcome, ApplyOutput, BulkOutcome, ErrorCategory, ErrorPayload, LayerResult,
        NodeType, ReasonCounts, ReasonItem, ReasonKind, ScanOutput, ScanReport, ScanScope,
        StyleKind, SuggestedStyle,
    };

    fn report() -> ScanReport {
        let mut reason = ReasonItem::new(ReasonKind::MissingFillStyle, Severity::Warning);
        reason.detail = Some("candidate available (fill style: Red)".into());
        let mut counts = ReasonCounts::default();
        counts.record(ReasonKind::MissingFillStyle);
        ScanReport {
            scanned_count: 4,
            scan_scope: ScanScope::Selection,
            layers: vec![LayerResult {
                id: "1:2".into(),
                name: "Box".into(),
                node_type: NodeType::Rectangle,
                path: vec!["Card".into(), "Box".into()],
                reasons: vec![reason],
                suggested_styles: vec![SuggestedStyle {
                    kind: StyleKind::Fill,
                    style_id: "S:red".into(),
                    style_name: "Red".into(),
                }],
            }],
            reason_counts: counts,
            text_reason_count: 0,
            color_reason_count: 1,
            critical_count: 0,
            warning_count: 1,
            text_style_options: vec![],
            paint_style_options: vec![],
        }
    }

    #[test]
    fn exit_codes_map_findings() {
        assert_eq!(exit_code_for_scan(3, false), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_scan(0, true), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_scan(1, true), ExitCode::from(1));
        assert_eq!(exit_code_for_apply(0), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_apply(2), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("err.json");
        let code = render_error(
            AuditError::Config("bad flag".into()),
            OutputFormat::Json,
            Some(path.clone()),
        );
        assert_eq!(code, ExitCode::from(2));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["mode"], "error");
    }

    #[test]
    fn format_pretty_lists_layers_reasons_and_suggestions() {
        let body = AuditOutput::Scan(ScanOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            document: "doc.json".into(),
            report: report(),
        });
        let text = format_pretty(&body, false);
        assert!(text.contains("[SCAN] 1 of 4 layer(s) flagged (selection)"));
        assert!(text.contains("- Card / Box (RECTANGLE, 1:2)"));
        assert!(text.contains("[warning] missing fill color style: candidate available"));
        assert!(text.contains("suggest fill -> Red (S:red)"));
    }

    #[test]
    fn format_pretty_shows_apply_failures() {
        let body = AuditOutput::Apply(ApplyOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            document: "doc.json".into(),
            outcome: BulkOutcome::from_results(vec![ApplyOutcome {
                ok: false,
                node_id: "9:9".into(),
                kind: StyleKind::Text,
                style_id: "T:1".into(),
                message: "target layer not found".into(),
            }]),
            written_to: None,
        });
        let text = format_pretty(&body, false);
        assert!(text.contains("[APPLY] 0/1 action(s) applied across 0 layer(s)"));
        assert!(text.contains("- 9:9 text T:1: target layer not found"));
    }

    #[test]
    fn pretty_to_file_writes_indented_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scan.json");
        let body = AuditOutput::Scan(ScanOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            document: "doc.json".into(),
            report: report(),
        });
        write_output(&body, OutputFormat::Pretty, Some(path.clone())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"mode\": \"scan\""), "{written}");

        write_output(&body, OutputFormat::Json, Some(path.clone())).unwrap();
        let compact = std::fs::read_to_string(&path).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn tint_wraps_only_when_colorized() {
        assert_eq!(tint("x", Tone::Red, false), "x");
        assert_eq!(tint("x", Tone::Cyan, true), "\x1b[36mx\x1b[0m");
    }

    #[test]
    fn format_pretty_handles_errors() {
        let body = AuditOutput::Error(ErrorOutput {
            version: AUDIT_OUTPUT_VERSION.to_string(),
            message: None,
            error: ErrorPayload::new(ErrorCategory::Document, "broken".into(), "fix the file"),
        });
        let text = format_pretty(&body, false);
        assert!(text.contains("[ERROR] broken"));
        assert!(text.contains("Hint: fix the file"));
    }
}
