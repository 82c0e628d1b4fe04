use std::path::Path;

use dsa_lib::{init_logging, AuditError, Config, FormatSetting, LoggingConfig};

use crate::cli::OutputFormat;

pub fn load_config(path: Option<&Path>) -> Result<Config, AuditError> {
    let cfg = if let Some(p) = path {
        Config::from_toml_file(p).map_err(|e| {
            AuditError::Config(format!("Failed to read config {}: {}", p.display(), e))
        })?
    } else {
        Config::default()
    };

    cfg.validate()
        .map_err(|e| AuditError::Config(format!("Invalid config: {}", e)))?;
    Ok(cfg)
}

pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// An explicit `--format` wins over the config file.
pub fn resolve_format(raw_args: &[String], cli_format: OutputFormat, config: &Config) -> OutputFormat {
    if flag_present(raw_args, "--format") {
        return cli_format;
    }
    match config.output.format {
        FormatSetting::Json => OutputFormat::Json,
        FormatSetting::Pretty => OutputFormat::Pretty,
    }
}

pub fn setup_logging(config: Option<&Config>, verbose: bool) {
    init_logging(LoggingConfig {
        env_filter: config.and_then(|c| c.log_level.clone()),
        verbose,
    });
}
