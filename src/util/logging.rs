//! Structured logging setup for issuecorpus
//!
//! Logging uses the `tracing` ecosystem. Output goes to stderr so stdout stays
//! free for run summaries, and may be switched to JSON for machine consumption.
//!
//! # Example
//!
//! ```no_run
//! use issuecorpus::util::logging;
//!
//! logging::init_logging(logging::config_from_env(None));
//!
//! tracing::info!("Application started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., issuecorpus::fetch) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

/// Parses a log level from a string
///
/// Unknown values fall back to `Level::INFO` with a note on stderr.
///
/// ```
/// use issuecorpus::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Builds the filter: `RUST_LOG` wins when set, otherwise the configured level
/// for this crate with HTTP internals held at `warn`
fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let directives = format!("issuecorpus={},h2=warn,hyper=warn,reqwest=warn", level);
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initializes the logging system with the provided configuration
///
/// Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

/// Logging configuration from the environment, with an optional level override
///
/// Reads `ISSUECORPUS_LOG_LEVEL` (unless `level_override` is set) and
/// `ISSUECORPUS_LOG_JSON`; `RUST_LOG` still overrides filtering when present.
pub fn config_from_env(level_override: Option<Level>) -> LoggingConfig {
    let level = level_override.unwrap_or_else(|| {
        let level_str = env::var("ISSUECORPUS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    });

    let use_json = env::var("ISSUECORPUS_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    LoggingConfig {
        level,
        use_json,
        include_target: use_json,
        ..LoggingConfig::default()
    }
}
