use std::path::PathBuf;
use std::process::ExitCode;

use dsa_lib::{
    AuditError, Document, Session, SessionControl, SessionOptions, UiEvent, UiMessage, UiSink,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::OutputFormat;
use crate::formatting::render_error;
use crate::settings::{load_config, setup_logging};

/// One JSON event per line on stdout.
struct StdoutSink;

impl UiSink for StdoutSink {
    fn post(&self, event: UiEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(err) => log::error!("could not encode event: {err}"),
        }
    }
}

fn relay_notifications(session: &Session<Document, StdoutSink>) {
    for message in session.host().take_notifications() {
        session.sink().post(UiEvent::Notify { message });
    }
}

/// Run the serve command: read `UiMessage`s from stdin until `cancel` or EOF.
pub async fn run_serve(
    config_path: Option<PathBuf>,
    verbose: bool,
    document: PathBuf,
    write: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            setup_logging(None, verbose);
            return render_error(err, OutputFormat::Json, None);
        }
    };
    setup_logging(Some(&config), verbose);

    let doc = match Document::from_path(&document) {
        Ok(doc) => doc,
        Err(err) => return render_error(err, OutputFormat::Json, None),
    };
    let session = Session::new(doc, StdoutSink, SessionOptions::from(&config));
    session.sink().post(UiEvent::AutoScanState {
        enabled: session.auto_scan(),
    });
    log::info!("serving {}", document.display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => return render_error(err.into(), OutputFormat::Json, None),
        };
        if line.trim().is_empty() {
            continue;
        }

        let control = match serde_json::from_str::<UiMessage>(&line) {
            Ok(message) => session.handle(message).await,
            Err(err) => {
                log::warn!("ignoring malformed message: {err}");
                session.sink().post(UiEvent::Error {
                    error: AuditError::from(err).to_payload(),
                });
                SessionControl::Continue
            }
        };
        relay_notifications(&session);
        if control == SessionControl::Close {
            break;
        }
    }

    if let Some(path) = write {
        if let Err(err) = session.host().save(&path) {
            return render_error(err, OutputFormat::Json, None);
        }
        log::info!("saved document to {}", path.display());
    }
    ExitCode::SUCCESS
}
