mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::ApplyTarget;
use dsa_lib::AuditError;

use crate::formatting::render_error;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    match args.command {
        Commands::Scan {
            document,
            select,
            format,
            output,
            fail_on_critical,
        } => {
            commands::run_scan(
                &raw_args,
                args.config,
                args.verbose,
                document,
                select,
                format,
                output,
                fail_on_critical,
            )
            .await
        }
        Commands::Apply {
            document,
            actions,
            node,
            kind,
            style,
            write,
            format,
            output,
        } => {
            let target = match (actions, node, kind, style) {
                (Some(path), _, _, _) => ApplyTarget::Actions(path),
                (None, Some(node), Some(kind), Some(style)) => ApplyTarget::Single {
                    node,
                    kind: kind.into(),
                    style,
                },
                _ => {
                    return render_error(
                        AuditError::config("apply needs --actions or --node/--kind/--style"),
                        format,
                        output,
                    )
                }
            };
            commands::run_apply(
                &raw_args,
                args.config,
                args.verbose,
                document,
                target,
                write,
                format,
                output,
            )
            .await
        }
        Commands::Serve { document, write } => {
            commands::run_serve(args.config, args.verbose, document, write).await
        }
    }
}
