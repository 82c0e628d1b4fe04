use std::path::PathBuf;
use std::process::ExitCode;

use dsa_lib::{
    scan_layers, AnalyzerOptions, AuditError, AuditOutput, Document, DocumentWriter, NodeId,
    ScanOutput, AUDIT_OUTPUT_VERSION,
};

use super::print_notifications;
use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_scan, render_error, write_output};
use crate::settings::{load_config, resolve_format, setup_logging};

/// Run the scan command.
#[allow(clippy::too_many_arguments)]
pub async fn run_scan(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    document: PathBuf,
    select: Vec<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
    fail_on_critical: bool,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            setup_logging(None, verbose);
            return render_error(err, format, output);
        }
    };
    setup_logging(Some(&config), verbose);
    let format = resolve_format(raw_args, format, &config);

    let doc = match Document::from_path(&document) {
        Ok(doc) => doc,
        Err(err) => return render_error(err, format, output),
    };
    if !select.is_empty() {
        let ids: Vec<NodeId> = select.iter().map(|id| NodeId::new(id.trim())).collect();
        if let Err(err) = doc.set_selection(&ids).await {
            return render_error(err.into(), format, output);
        }
    }

    let options = AnalyzerOptions {
        mixed_text_warning: config.mixed_text_warning,
    };
    let report = match scan_layers(&doc, options).await {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };
    if config.notify {
        doc.notify(&format!(
            "scan complete ({}): {} layer(s)",
            report.scan_scope.label(),
            report.layers.len()
        ));
        print_notifications(&doc);
    }

    let code = exit_code_for_scan(report.critical_count, fail_on_critical);
    let body = AuditOutput::Scan(ScanOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        document: document.display().to_string(),
        report,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::Unknown(err.to_string()), format, output);
    }
    code
}
