// src/supervisor/liveness.rs

//! Inferring whether the recorded process is alive.
//!
//! Two independent signals are used, one per command:
//!
//! - `status` looks at the log file's mtime. It is cheap and meant for
//!   frequent polling, but it is only a heuristic: a healthy server that has
//!   not logged anything for the freshness window is reported as stopped.
//! - `health` asks the process table about the recorded PID and then probes
//!   the configured TCP port. The two results are reported separately.
//!
//! Both checks self-heal: when they conclude the process is gone, the PID
//! record is removed.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::AgentError;
use crate::exec::ProcessTable;
use crate::supervisor::pid_store::PidStore;
use crate::supervisor::report::{LogInfo, PortCheck, ProcessCheck, StatusReport, StopReason};

/// What a PID record lookup produced.
enum Recorded {
    Pid(u32),
    Absent,
    Corrupt,
    Unreadable(String),
}

pub struct LivenessProbe {
    store: PidStore,
    log_path: PathBuf,
    port: u16,
    freshness_window: Duration,
    connect_timeout: Duration,
    processes: Arc<dyn ProcessTable>,
}

impl LivenessProbe {
    pub fn new(
        store: PidStore,
        log_path: impl Into<PathBuf>,
        port: u16,
        processes: Arc<dyn ProcessTable>,
    ) -> Self {
        Self {
            store,
            log_path: log_path.into(),
            port,
            freshness_window: crate::supervisor::settings::DEFAULT_FRESHNESS_WINDOW,
            connect_timeout: crate::supervisor::settings::DEFAULT_CONNECT_TIMEOUT,
            processes,
        }
    }

    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Log-freshness status check against the current time.
    pub fn status(&self) -> StatusReport {
        self.status_at(SystemTime::now())
    }

    /// Log-freshness status check against `now`.
    pub fn status_at(&self, now: SystemTime) -> StatusReport {
        let pid = match self.recorded() {
            Recorded::Pid(pid) => pid,
            Recorded::Absent => return StatusReport::Stopped(StopReason::NotRecorded),
            Recorded::Corrupt => return StatusReport::Stopped(StopReason::CorruptRecord),
            Recorded::Unreadable(reason) => return StatusReport::Unknown(reason),
        };

        let meta = match fs::metadata(&self.log_path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(pid, log = %self.log_path.display(), error = %e, "log file not readable");
                self.heal(pid, "log file missing");
                return StatusReport::Stopped(StopReason::LogMissing { pid });
            }
        };

        let Ok(modified) = meta.modified() else {
            self.heal(pid, "log mtime unavailable");
            return StatusReport::Stopped(StopReason::LogMissing { pid });
        };

        // An mtime ahead of `now` (clock skew) counts as fresh.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age < self.freshness_window {
            return StatusReport::Alive {
                pid,
                port: self.port,
                log: LogInfo {
                    path: self.log_path.clone(),
                    size: meta.len(),
                    modified,
                },
            };
        }

        self.heal(pid, "log is stale");
        StatusReport::Stopped(StopReason::LogStale { pid, age })
    }

    /// Authoritative process-table check used by `health`.
    pub fn process_check(&self) -> ProcessCheck {
        let pid = match self.recorded() {
            Recorded::Pid(pid) => pid,
            Recorded::Absent | Recorded::Corrupt => return ProcessCheck::NotRecorded,
            Recorded::Unreadable(reason) => return ProcessCheck::Unknown(reason),
        };

        if self.processes.exists(pid) {
            ProcessCheck::Running(pid)
        } else {
            self.heal(pid, "process not found");
            ProcessCheck::Missing(pid)
        }
    }

    /// Try a TCP connection to the configured port on localhost.
    pub async fn port_check(&self) -> PortCheck {
        let port = self.port;
        match timeout(self.connect_timeout, TcpStream::connect(("127.0.0.1", port))).await {
            Ok(Ok(_stream)) => PortCheck::Reachable(port),
            Ok(Err(e)) => PortCheck::Unreachable {
                port,
                error: e.to_string(),
            },
            Err(_) => PortCheck::Unreachable {
                port,
                error: format!("no answer within {:?}", self.connect_timeout),
            },
        }
    }

    fn recorded(&self) -> Recorded {
        match self.store.read() {
            Ok(Some(pid)) => Recorded::Pid(pid),
            Ok(None) => Recorded::Absent,
            Err(AgentError::CorruptPidRecord { content, .. }) => {
                warn!(content = %content.trim(), "corrupt PID file; removing it");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "could not remove corrupt PID file");
                }
                Recorded::Corrupt
            }
            Err(e) => {
                warn!(error = %e, "could not read PID file");
                Recorded::Unreadable(e.to_string())
            }
        }
    }

    fn heal(&self, pid: u32, why: &str) {
        info!(pid, reason = why, "process presumed dead; clearing PID record");
        if let Err(e) = self.store.clear() {
            warn!(pid, error = %e, "could not clear stale PID record");
        }
    }
}

impl std::fmt::Debug for LivenessProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivenessProbe")
            .field("pid_path", &self.store.path())
            .field("log_path", &self.log_path)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
