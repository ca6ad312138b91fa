// src/supervisor/settings.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::artifact::{DEFAULT_ARTIFACT_GLOB, DEFAULT_BUILD_DIR};
use crate::config::{RuntimeConfig, default_config_path};
use crate::exec::Launcher;
use crate::exec::spawner::DEFAULT_LOG_PATH;
use crate::supervisor::pid_store::DEFAULT_PID_PATH;
use crate::types::DEFAULT_PORT;

/// How long after its last write the log still counts as a sign of life.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Upper bound for the health check's TCP connect.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Everything one supervisor invocation needs to know, built once from the
/// CLI and passed down explicitly.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    /// Directory `list` scans for config files.
    pub project_dir: PathBuf,
    pub config_path: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
    pub build_dir: PathBuf,
    pub artifact_glob: String,
    /// Port from the command line; overrides the config's `port`.
    pub port: Option<u16>,
    pub launcher: Launcher,
    pub freshness_window: Duration,
    pub connect_timeout: Duration,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            config_path: default_config_path(),
            pid_path: PathBuf::from(DEFAULT_PID_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            artifact_glob: DEFAULT_ARTIFACT_GLOB.to_string(),
            port: None,
            launcher: Launcher::default(),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl SupervisorSettings {
    /// Default settings with every well-known path placed under `dir`.
    pub fn rooted_at(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let defaults = Self::default();
        Self {
            project_dir: dir.to_path_buf(),
            config_path: dir.join(defaults.config_path),
            pid_path: dir.join(defaults.pid_path),
            log_path: dir.join(defaults.log_path),
            build_dir: dir.join(defaults.build_dir),
            ..defaults
        }
    }

    /// Effective port: command line, then the config's `port`, then 8080.
    pub fn resolve_port(&self, config: Option<&RuntimeConfig>) -> u16 {
        self.port
            .or_else(|| config.and_then(RuntimeConfig::port))
            .unwrap_or(DEFAULT_PORT)
    }

    /// Extra arguments for the launched server. The port is only passed
    /// when it differs from the server's own default.
    pub fn server_args(&self, port: u16) -> Vec<String> {
        if port == DEFAULT_PORT {
            Vec::new()
        } else {
            vec![format!("--server.port={port}")]
        }
    }
}
