//! Logger initialization.
//!
//! Everything in the library logs through the `log` facade; the binary picks
//! `env_logger` as the backend. Logs go to stderr so JSON output on stdout
//! stays machine readable.

use std::sync::Once;

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax, e.g. "info" or "dsa_lib=debug,warn".
    pub env_filter: Option<String>,
    pub verbose: bool,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if config.verbose {
            builder.filter_level(log::LevelFilter::Debug);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Warn);
        }

        builder.target(env_logger::Target::Stderr);
        // A test harness may already own the logger.
        let _ = builder.try_init();

        log::debug!("logging initialized");
    });
}
