//! Auditor configuration loaded from an optional TOML file.
//!
//! Precedence is CLI flag > config file > defaults; the binary resolves the
//! flags, this module only owns the file layer and its defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rescan automatically when the host selection changes.
    pub auto_scan: bool,
    /// Run the per-run mixed font detector on text layers.
    pub mixed_text_warning: bool,
    /// Forward status notifications to the host.
    pub notify: bool,
    /// `env_logger` filter; only a bare level is validated.
    pub log_level: Option<String>,
    pub output: OutputSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_scan: false,
            mixed_text_warning: true,
            notify: true,
            log_level: None,
            output: OutputSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: FormatSetting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSetting {
    #[default]
    Json,
    Pretty,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| AuditError::config(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            let is_filter = level.contains('=') || level.contains(',');
            if !is_filter && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(AuditError::config(format!(
                    "log_level must be one of {} (got {:?})",
                    LOG_LEVELS.join("|"),
                    level
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert!(!cfg.auto_scan);
        assert!(cfg.mixed_text_warning);
        assert!(cfg.notify);
        assert_eq!(cfg.output.format, FormatSetting::Json);
        cfg.validate().unwrap();
    }

    #[test]
    fn parses_all_sections() {
        let cfg = Config::from_toml_str(
            r#"
auto_scan = true
mixed_text_warning = false
notify = false
log_level = "debug"
[output]
format = "pretty"
"#,
        )
        .unwrap();
        assert!(cfg.auto_scan);
        assert!(!cfg.mixed_text_warning);
        assert!(!cfg.notify);
        assert_eq!(cfg.output.format, FormatSetting::Pretty);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_log_level() {
        let cfg = Config::from_toml_str("log_level = \"loud\"").unwrap();
        assert!(matches!(cfg.validate(), Err(AuditError::Config(_))));
    }

    #[test]
    fn accepts_module_filters() {
        let cfg = Config::from_toml_str("log_level = \"dsa_lib=debug,warn\"").unwrap();
        cfg.validate().unwrap();
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(
            Config::from_toml_str("auto_scan = ["),
            Err(AuditError::Config(_))
        ));
    }
}
