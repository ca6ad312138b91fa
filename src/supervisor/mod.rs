// src/supervisor/mod.rs

//! Lifecycle supervisor for the single locally-run agent process.
//!
//! This module ties together:
//! - the config loader (`start` preconditions, `list`)
//! - the artifact locator
//! - the process spawner and its reaper
//! - the PID store, the only state shared between invocations
//! - the liveness probe behind `status` and `health`
//!
//! Each CLI invocation builds one [`Supervisor`] from explicit
//! [`SupervisorSettings`] and runs a single operation on it.

pub mod liveness;
pub mod pid_store;
pub mod report;
pub mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use tracing::{info, warn};

use crate::artifact::ArtifactLocator;
use crate::config::{RuntimeConfig, discover_configs, load_from_fs};
use crate::errors::{AgentError, Result};
use crate::exec::{ProcessSpawner, ProcessTable, RealProcessTable};
use crate::fs::{FileSystem, RealFileSystem};

pub use liveness::LivenessProbe;
pub use pid_store::PidStore;
pub use report::{
    HealthReport, LogInfo, PortCheck, ProcessCheck, StartReport, StatusReport, StopOutcome,
    StopReason,
};
pub use settings::SupervisorSettings;

pub struct Supervisor {
    settings: SupervisorSettings,
    fs: Arc<dyn FileSystem>,
    processes: Arc<dyn ProcessTable>,
}

impl Supervisor {
    /// Supervisor backed by the real filesystem and process table.
    pub fn new(settings: SupervisorSettings) -> Self {
        Self::with_backends(settings, Arc::new(RealFileSystem), Arc::new(RealProcessTable))
    }

    pub fn with_backends(
        settings: SupervisorSettings,
        fs: Arc<dyn FileSystem>,
        processes: Arc<dyn ProcessTable>,
    ) -> Self {
        Self {
            settings,
            fs,
            processes,
        }
    }

    pub fn pid_store(&self) -> PidStore {
        PidStore::new(&self.settings.pid_path)
    }

    /// Liveness probe for the given port.
    pub fn probe(&self, port: u16) -> LivenessProbe {
        LivenessProbe::new(
            self.pid_store(),
            &self.settings.log_path,
            port,
            Arc::clone(&self.processes),
        )
        .with_freshness_window(self.settings.freshness_window)
        .with_connect_timeout(self.settings.connect_timeout)
    }

    /// Load and validate the configured runtime config.
    pub fn load_config(&self) -> Result<RuntimeConfig> {
        let raw = load_from_fs(self.fs.as_ref(), &self.settings.config_path)?;
        RuntimeConfig::try_from(raw)
    }

    /// Validate preconditions, resolve the artifact and launch it.
    ///
    /// Preconditions are checked in order (config present, config valid,
    /// runtime installed, artifact resolvable) and the first failure aborts
    /// before anything is spawned or recorded.
    pub async fn start(&self, detach: bool) -> Result<StartReport> {
        let config = self.load_config()?;
        let framework = config.framework();
        info!(
            config = %self.settings.config_path.display(),
            name = config.name(),
            %framework,
            "config loaded"
        );

        self.settings.launcher.check_runtime().await?;

        let artifact = ArtifactLocator::new(self.fs.as_ref(), &self.settings.build_dir)
            .locate(&self.settings.artifact_glob)?;
        info!(artifact = %artifact.display(), "artifact resolved");

        if detach {
            self.warn_if_already_running();
        }

        let port = self.settings.resolve_port(Some(&config));
        let args = self.settings.server_args(port);

        let spawner = ProcessSpawner::new(
            self.settings.launcher.clone(),
            &self.settings.log_path,
            self.pid_store(),
        );
        let outcome = spawner.spawn(&artifact, &args, detach).await?;

        Ok(StartReport {
            framework,
            artifact,
            port,
            outcome,
        })
    }

    /// Stop the recorded process: SIGTERM, falling back to SIGKILL.
    ///
    /// The record is cleared whatever the signals achieved. No wait happens
    /// between the two signals.
    pub fn stop(&self) -> Result<StopOutcome> {
        let store = self.pid_store();
        let pid = match store.read() {
            Ok(Some(pid)) => pid,
            Ok(None) => return Ok(StopOutcome::NotRunning),
            Err(AgentError::CorruptPidRecord { .. }) => {
                warn!(path = %store.path().display(), "PID file is corrupt; removing it");
                store.clear()?;
                return Ok(StopOutcome::NotRunning);
            }
            Err(e) => return Err(e),
        };

        let outcome = match self.processes.send(pid, Signal::SIGTERM) {
            Ok(()) => Ok(StopOutcome::Terminated(pid)),
            Err(term_err) => {
                warn!(pid, error = %term_err, "SIGTERM failed; sending SIGKILL");
                match self.processes.send(pid, Signal::SIGKILL) {
                    Ok(()) => Ok(StopOutcome::Killed(pid)),
                    Err(Errno::ESRCH) => Ok(StopOutcome::AlreadyExited(pid)),
                    Err(source) => Err(AgentError::SignalFailed { pid, source }),
                }
            }
        };

        let cleared = store.clear();
        let outcome = outcome?;
        cleared?;
        info!(pid, ?outcome, "stop finished");
        Ok(outcome)
    }

    /// Log-freshness status. Never fails.
    pub fn status(&self) -> StatusReport {
        self.probe(self.display_port()).status()
    }

    /// Process-table check, port probe and config presence, each reported
    /// on its own.
    pub async fn health(&self) -> HealthReport {
        let probe = self.probe(self.display_port());
        let process = probe.process_check();

        let port = match process {
            ProcessCheck::Running(_) => Some(probe.port_check().await),
            _ => None,
        };
        let config_present = match process {
            ProcessCheck::NotRecorded => None,
            _ => Some(self.fs.is_file(&self.settings.config_path)),
        };

        HealthReport {
            process,
            port,
            config_present,
            config_path: self.settings.config_path.clone(),
        }
    }

    /// All valid config files in the project directory.
    pub fn list(&self) -> Result<Vec<(PathBuf, RuntimeConfig)>> {
        discover_configs(self.fs.as_ref(), &self.settings.project_dir)
    }

    /// Port to report for `status` and `health`: the flag, else the config's
    /// port if the config loads, else the default.
    fn display_port(&self) -> u16 {
        let config = match self.settings.port {
            Some(_) => None,
            None => self.load_config().ok(),
        };
        self.settings.resolve_port(config.as_ref())
    }

    fn warn_if_already_running(&self) {
        if let Ok(Some(pid)) = self.pid_store().read() {
            if self.processes.exists(pid) {
                warn!(pid, "a recorded agent process is still running; its PID record will be replaced");
            }
        }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
