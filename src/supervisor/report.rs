// src/supervisor/report.rs

//! Results of supervisor operations and their user-facing rendering.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};

use crate::exec::SpawnResult;
use crate::types::Framework;

/// Metadata of the log file, as read by the status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Why `status` considers the process stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// No PID record exists.
    NotRecorded,
    /// The PID file was unreadable as a PID and has been removed.
    CorruptRecord,
    /// A PID was recorded but there is no log file.
    LogMissing { pid: u32 },
    /// A PID was recorded but the log has not been written for `age`.
    LogStale { pid: u32, age: Duration },
}

/// Best-known state reported by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Alive { pid: u32, port: u16, log: LogInfo },
    Stopped(StopReason),
    /// The PID record exists but could not be read.
    Unknown(String),
}

impl StatusReport {
    pub fn is_alive(&self) -> bool {
        matches!(self, StatusReport::Alive { .. })
    }
}

/// Process-table half of `health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCheck {
    NotRecorded,
    Running(u32),
    /// Recorded PID has no process; the record has been removed.
    Missing(u32),
    Unknown(String),
}

/// Port half of `health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCheck {
    Reachable(u16),
    Unreachable { port: u16, error: String },
}

/// Result of `health`. Each check is reported on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub process: ProcessCheck,
    /// Only probed when the process is running.
    pub port: Option<PortCheck>,
    /// `None` when the process check already ended the diagnosis.
    pub config_present: Option<bool>,
    pub config_path: PathBuf,
}

impl HealthReport {
    pub fn process_healthy(&self) -> bool {
        matches!(self.process, ProcessCheck::Running(_))
    }
}

/// Result of `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Terminated(u32),
    Killed(u32),
    /// Neither signal could be delivered because the process was gone.
    AlreadyExited(u32),
}

/// Result of `start`.
#[derive(Debug)]
pub struct StartReport {
    pub framework: Framework,
    pub artifact: PathBuf,
    pub port: u16,
    pub outcome: SpawnResult,
}

impl StartReport {
    /// Process exit code for the CLI: the child's own code in the foreground,
    /// 0 once a detached child is running.
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            SpawnResult::Exited(code) => *code,
            SpawnResult::Detached(_) => 0,
        }
    }
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Agent status:")?;
        match self {
            StatusReport::Alive { pid, port, log } => {
                writeln!(f, "  state: running")?;
                writeln!(f, "  PID: {pid}")?;
                writeln!(f, "  port: {port}")?;
                writeln!(f, "  log: {} ({} bytes)", log.path.display(), log.size)?;
                write!(f, "  last update: {}", format_time(log.modified))
            }
            StatusReport::Stopped(StopReason::NotRecorded) => write!(f, "  state: stopped"),
            StatusReport::Stopped(StopReason::CorruptRecord) => {
                write!(f, "  state: stopped (PID file was corrupt and has been removed)")
            }
            StatusReport::Stopped(StopReason::LogMissing { pid })
            | StatusReport::Stopped(StopReason::LogStale { pid, .. }) => {
                write!(f, "  state: stopped (process {pid} is gone)")
            }
            StatusReport::Unknown(reason) => write!(f, "  state: unknown ({reason})"),
        }
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Agent health:")?;
        match &self.process {
            ProcessCheck::NotRecorded => return write!(f, "  [info] agent is not running"),
            ProcessCheck::Running(pid) => writeln!(f, "  [ok]   process {pid} is running")?,
            ProcessCheck::Missing(pid) => {
                writeln!(f, "  [fail] process {pid} does not exist (stale PID file removed)")?
            }
            ProcessCheck::Unknown(reason) => {
                writeln!(f, "  [fail] cannot read process information: {reason}")?
            }
        }
        match &self.port {
            Some(PortCheck::Reachable(port)) => writeln!(f, "  [ok]   port {port} accepts connections")?,
            Some(PortCheck::Unreachable { port, error }) => {
                writeln!(f, "  [warn] port {port} is not reachable: {error}")?
            }
            None => {}
        }
        match self.config_present {
            Some(true) => writeln!(f, "  [ok]   config file {} exists", self.config_path.display())?,
            Some(false) => writeln!(
                f,
                "  [warn] config file {} does not exist",
                self.config_path.display()
            )?,
            None => {}
        }
        write!(f, "Health check finished")
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopOutcome::NotRunning => write!(f, "No running agent"),
            StopOutcome::Terminated(pid) => write!(f, "Agent stopped (sent SIGTERM to {pid})"),
            StopOutcome::Killed(pid) => write!(f, "Agent stopped (sent SIGKILL to {pid})"),
            StopOutcome::AlreadyExited(pid) => {
                write!(f, "Agent process {pid} had already exited")
            }
        }
    }
}

impl fmt::Display for StartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "framework: {}", self.framework)?;
        writeln!(f, "artifact: {}", self.artifact.display())?;
        match &self.outcome {
            SpawnResult::Exited(code) => write!(f, "Agent exited with code {code}"),
            SpawnResult::Detached(proc) => {
                writeln!(f, "Agent running in background")?;
                writeln!(f, "  PID: {}", proc.pid)?;
                writeln!(f, "  URL: http://localhost:{}", self.port)?;
                write!(f, "  log: {}", proc.log_path.display())
            }
        }
    }
}
