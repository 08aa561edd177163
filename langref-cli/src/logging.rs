//! Logging setup for the `langref` binary.
//!
//! Libraries emit `tracing` events; this module installs the one subscriber that prints them.
//! Logs always go to stderr so stdout carries nothing but progress lines and command output.
//!
//! # Log Levels
//!
//! - `error`: nothing beyond the final `error:` line
//! - `warn` : `-q`
//! - `info` : default, build stages and summary counts
//! - `debug`: `-v`, one event per parsed or written file
//! - `trace`: `-vv`

use std::io;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: &[&str] = &[
    "langref_cli",
    "langref_compiler",
    "langref_babel",
    "langref_config",
    "langref_core",
];

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` decide when no verbosity flag was given.
    pub use_env_filter: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            use_env_filter: true,
            with_ansi: false,
        }
    }
}

impl LogConfig {
    /// - `quiet`: warn
    /// - 0: info, or `RUST_LOG` when set
    /// - 1 (`-v`): debug
    /// - 2+ (`-vv`): trace
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        let level_filter = match (quiet, verbosity) {
            (true, _) => LevelFilter::WARN,
            (false, 0) => LevelFilter::INFO,
            (false, 1) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        };
        Self {
            level_filter,
            use_env_filter: !quiet && verbosity == 0,
            ..Self::default()
        }
    }
}

/// Install the global subscriber. Must be called once, before any command runs.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(layer)
        .try_init()
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || {
        // Other crates stay at warn to keep the output about our own work.
        let level = config.level_filter.to_string().to_lowercase();
        let directives = CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(format!("warn,{directives}"))
    };

    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
