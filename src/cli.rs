// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `agent-runtime`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "agent-runtime",
    version,
    about = "Start, stop and inspect a locally-run agent server.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `AGENT_RUNTIME_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Java executable used to run the artifact.
    ///
    /// If omitted, `AGENT_RUNTIME_JAVA` or `java` from PATH is used.
    #[arg(long, global = true, value_name = "PATH")]
    pub java: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the agent from a runtime config.
    Start {
        /// Path to the runtime config (JSON).
        #[arg(value_name = "CONFIG", default_value = "runtime.config.json")]
        config: PathBuf,

        /// Run in the background with output redirected to logs/agent.log.
        #[arg(short, long)]
        detach: bool,

        /// Server port; overrides the config's `port`.
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
    /// Stop the background agent.
    Stop,
    /// Show whether the background agent is running.
    Status {
        /// Port to report; defaults to the config's `port` or 8080.
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
    /// Check the agent process, its port and the config file.
    Health {
        /// Port to probe; defaults to the config's `port` or 8080.
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
    /// List the runtime configs in the current directory.
    List,
    /// Inspect runtime config files.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Check required keys and the framework.
    Validate {
        #[arg(value_name = "CONFIG", default_value = "runtime.config.json")]
        config: PathBuf,
    },
    /// Pretty-print a config file.
    Show {
        #[arg(value_name = "CONFIG", default_value = "runtime.config.json")]
        config: PathBuf,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
