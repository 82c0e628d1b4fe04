use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dsa_lib::{
    apply_bulk, apply_style, ApplyOutput, AuditError, AuditOutput, BulkOutcome, Document,
    NodeId, StyleAction, StyleKind, AUDIT_OUTPUT_VERSION,
};

use super::print_notifications;
use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_apply, render_error, write_output};
use crate::settings::{load_config, resolve_format, setup_logging};

/// What to apply: a file of actions, or one action from flags.
#[derive(Debug, Clone)]
pub enum ApplyTarget {
    Actions(PathBuf),
    Single {
        node: String,
        kind: StyleKind,
        style: String,
    },
}

fn load_actions(path: &Path) -> Result<Vec<StyleAction>, AuditError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Run the apply command.
#[allow(clippy::too_many_arguments)]
pub async fn run_apply(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    document: PathBuf,
    target: ApplyTarget,
    write: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
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

    let outcome = match target {
        ApplyTarget::Actions(path) => {
            let actions = match load_actions(&path) {
                Ok(actions) => actions,
                Err(err) => return render_error(err, format, output),
            };
            apply_bulk(&doc, &actions, config.notify).await
        }
        ApplyTarget::Single { node, kind, style } => {
            let result = apply_style(&doc, &NodeId::new(node), kind, &style, config.notify).await;
            BulkOutcome::from_results(vec![result])
        }
    };
    print_notifications(&doc);

    let written_to = match &write {
        Some(path) => {
            if let Err(err) = doc.save(path) {
                return render_error(err, format, output);
            }
            log::info!("saved document to {}", path.display());
            Some(path.display().to_string())
        }
        None => None,
    };

    let code = exit_code_for_apply(outcome.failed_actions);
    let body = AuditOutput::Apply(ApplyOutput {
        version: AUDIT_OUTPUT_VERSION.to_string(),
        document: document.display().to_string(),
        outcome,
        written_to,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::Unknown(err.to_string()), format, output);
    }
    code
}
