// src/exec/spawner.rs

//! Launching the artifact, attached or detached.

use std::fs::{self, File};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::{AgentError, Result};
use crate::exec::launcher::Launcher;
use crate::exec::reaper::spawn_reaper;
use crate::supervisor::pid_store::PidStore;

/// Default log location for detached processes.
pub const DEFAULT_LOG_PATH: &str = "logs/agent.log";

/// The log file a detached child writes to.
///
/// Holding a `LogSink` keeps one handle to the file open; the reaper drops it
/// once the child has exited.
#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    file: File,
}

impl LogSink {
    /// Create the parent directory if needed and open `path`, truncating any
    /// previous contents.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A `Stdio` writing to the same file, for one of the child's streams.
    fn stdio(&self) -> io::Result<Stdio> {
        Ok(Stdio::from(self.file.try_clone()?))
    }
}

/// Outcome of [`ProcessSpawner::spawn`].
#[derive(Debug)]
pub enum SpawnResult {
    /// Foreground child ran to completion with this exit code.
    Exited(i32),
    /// Detached child is running and recorded.
    Detached(DetachedProcess),
}

/// A running detached child.
#[derive(Debug)]
pub struct DetachedProcess {
    pub pid: u32,
    pub log_path: PathBuf,
    /// Completes when the child exits and the record has been reconciled.
    pub reaper: JoinHandle<Option<i32>>,
}

/// Starts artifacts through a [`Launcher`].
#[derive(Debug, Clone)]
pub struct ProcessSpawner {
    launcher: Launcher,
    log_path: PathBuf,
    pid_store: PidStore,
}

impl ProcessSpawner {
    pub fn new(launcher: Launcher, log_path: impl Into<PathBuf>, pid_store: PidStore) -> Self {
        Self {
            launcher,
            log_path: log_path.into(),
            pid_store,
        }
    }

    pub async fn spawn(&self, artifact: &Path, args: &[String], detach: bool) -> Result<SpawnResult> {
        if detach {
            self.spawn_detached(artifact, args).await.map(SpawnResult::Detached)
        } else {
            self.run_foreground(artifact, args).await.map(SpawnResult::Exited)
        }
    }

    /// Run attached to the caller's stdio and wait for the exit code.
    ///
    /// Ctrl-C reaches the child through the terminal; the supervisor keeps
    /// waiting so that the child's own exit code is the one propagated.
    pub async fn run_foreground(&self, artifact: &Path, args: &[String]) -> Result<i32> {
        info!(
            cmd = %self.launcher.render(artifact, args),
            "starting process in foreground"
        );

        let mut child = self
            .launcher
            .command(artifact, args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| self.spawn_failed(source))?;

        let status = tokio::select! {
            status = child.wait() => status?,
            interrupted = tokio::signal::ctrl_c() => {
                if let Err(e) = interrupted {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                } else {
                    info!("interrupt received; waiting for process to exit");
                }
                child.wait().await?
            }
        };

        let code = exit_code(status);
        info!(exit_code = code, success = status.success(), "foreground process exited");
        Ok(code)
    }

    /// Start detached with output redirected to the log file, record the PID,
    /// and hand the child to a reaper.
    ///
    /// Either the child is running and its PID is recorded, or neither: when
    /// the PID cannot be written the child is killed before returning.
    pub async fn spawn_detached(&self, artifact: &Path, args: &[String]) -> Result<DetachedProcess> {
        let log = LogSink::create(&self.log_path).map_err(|source| self.spawn_failed(source))?;

        let mut command = self.launcher.command(artifact, args);
        command.stdin(Stdio::null());
        let spawned = log.stdio().and_then(|out| {
            let err = log.stdio()?;
            command.stdout(out).stderr(err).spawn()
        });

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                drop(log);
                error!(error = %source, "failed to start detached process");
                return Err(self.spawn_failed(source));
            }
        };

        let Some(pid) = child.id() else {
            drop(log);
            return Err(self.spawn_failed(io::Error::other("child exited before its PID was read")));
        };

        if let Err(err) = self.pid_store.write(pid) {
            error!(pid, error = %err, "could not record PID; killing process");
            if let Err(e) = child.kill().await {
                warn!(pid, error = %e, "failed to kill unrecorded process");
            }
            drop(log);
            return Err(match err {
                AgentError::PidStoreIo { path, source, .. } => AgentError::PidStoreIo {
                    path,
                    pid: Some(pid),
                    source,
                },
                other => other,
            });
        }

        info!(
            pid,
            cmd = %self.launcher.render(artifact, args),
            log = %log.path().display(),
            pid_file = %self.pid_store.path().display(),
            "process started in background"
        );

        let log_path = log.path().to_path_buf();
        let reaper = spawn_reaper(child, pid, log, self.pid_store.clone());

        Ok(DetachedProcess {
            pid,
            log_path,
            reaper,
        })
    }

    fn spawn_failed(&self, source: io::Error) -> AgentError {
        AgentError::SpawnFailed {
            program: self.launcher.program_name(),
            source,
        }
    }
}

/// Exit code to propagate for a finished child. Signal deaths map to the
/// shell convention of 128 + signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}
