// src/logging.rs

//! Logging setup for `agent-runtime` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level`
//! 2. `AGENT_RUNTIME_LOG`, either a bare level ("debug", "warning") or full
//!    `EnvFilter` directives ("agent_runtime::supervisor=trace,info")
//! 3. `info`
//!
//! Everything goes to STDERR. Stdout carries only command reports and the
//! output of a foreground agent.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "AGENT_RUNTIME_LOG";

const DEFAULT_LEVEL: Level = Level::INFO;

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => level_filter(level_from_log_level(lvl)),
        None => filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Filter for the value of [`LOG_ENV_VAR`]. Unparsable values fall back to
/// the default level rather than failing startup.
pub fn filter_from_env(value: Option<&str>) -> EnvFilter {
    let Some(spec) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return level_filter(DEFAULT_LEVEL);
    };
    if let Some(level) = parse_level_str(spec) {
        return level_filter(level);
    }
    EnvFilter::try_new(spec).unwrap_or_else(|e| {
        eprintln!("agent-runtime: ignoring {LOG_ENV_VAR}={spec:?}: {e}");
        level_filter(DEFAULT_LEVEL)
    })
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(level.into())
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
