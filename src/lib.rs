// src/lib.rs

pub mod artifact;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod supervisor;
pub mod types;

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::cli::{CliArgs, Command, ConfigCommand};
use crate::config::{load_and_validate, render_config};
use crate::errors::{AgentError, Result};
use crate::exec::{Launcher, SpawnResult};
use crate::supervisor::{Supervisor, SupervisorSettings};

/// Environment variable naming the Java executable when `--java` is absent.
pub const JAVA_ENV_VAR: &str = "AGENT_RUNTIME_JAVA";

/// High-level entry point used by `main.rs`.
///
/// Builds the per-invocation settings from the CLI, runs one command and
/// returns the process exit code. Errors carry the diagnostic and hint the
/// caller prints.
pub async fn run(args: CliArgs) -> Result<i32> {
    let mut settings = SupervisorSettings {
        launcher: Launcher::java(java_program(args.java.as_deref())),
        ..SupervisorSettings::default()
    };

    match args.command {
        Command::Start {
            config,
            detach,
            port,
        } => {
            settings.config_path = config;
            settings.port = port;
            println!("Starting agent (config: {})", settings.config_path.display());

            let report = Supervisor::new(settings).start(detach).await?;
            println!("{report}");
            if let SpawnResult::Detached(proc) = &report.outcome {
                debug!(pid = proc.pid, "leaving detached process to run on its own");
            }
            Ok(report.exit_code())
        }
        Command::Stop => {
            let outcome = Supervisor::new(settings).stop()?;
            println!("{outcome}");
            Ok(0)
        }
        Command::Status { port } => {
            settings.port = port;
            println!("{}", Supervisor::new(settings).status());
            Ok(0)
        }
        Command::Health { port } => {
            settings.port = port;
            println!("{}", Supervisor::new(settings).health().await);
            Ok(0)
        }
        Command::List => {
            let configs = Supervisor::new(settings).list()?;
            print_list(&configs);
            Ok(0)
        }
        Command::Config(ConfigCommand::Validate { config }) => {
            load_and_validate(&config)?;
            println!("{} is valid", config.display());
            Ok(0)
        }
        Command::Config(ConfigCommand::Show { config }) => {
            show_config(&config)?;
            // A missing file is informational, like `stop` without a record.
            Ok(0)
        }
        Command::Version => {
            println!("agent-runtime v{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

/// `--java`, then `AGENT_RUNTIME_JAVA`, then `java` from PATH.
fn java_program(flag: Option<&Path>) -> OsString {
    flag.map(|p| p.as_os_str().to_os_string())
        .or_else(|| std::env::var_os(JAVA_ENV_VAR).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| OsString::from("java"))
}

fn print_list(configs: &[(std::path::PathBuf, config::RuntimeConfig)]) {
    println!("Agents:");
    if configs.is_empty() {
        println!("  no runtime config files found");
        return;
    }
    for (path, cfg) in configs {
        println!("  - {} (v{}) - {}", cfg.name(), cfg.version(), cfg.framework());
        println!("    config: {}", path.display());
    }
}

fn show_config(path: &Path) -> Result<()> {
    let Some(pretty) = render_config(path)? else {
        let missing = AgentError::ConfigNotFound(path.to_path_buf());
        println!("{missing}");
        if let Some(hint) = missing.hint() {
            println!("hint: {hint}");
        }
        return Ok(());
    };
    println!("Config file: {}\n", path.display());
    println!("{pretty}");
    Ok(())
}
