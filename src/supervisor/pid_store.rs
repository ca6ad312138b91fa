// src/supervisor/pid_store.rs

//! Single-slot, file-backed record of the supervised process.
//!
//! The file holds the decimal PID and nothing else. Its mtime doubles as the
//! start time of the process. Nothing else in the crate writes to this path.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::errors::{AgentError, Result};

/// Well-known PID file location, relative to the working directory.
pub const DEFAULT_PID_PATH: &str = ".agent.pid";

#[derive(Debug, Clone)]
pub struct PidStore {
    path: PathBuf,
}

impl PidStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the record with `pid`, creating the file if needed.
    pub fn write(&self, pid: u32) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(pid.to_string().as_bytes())
            .map_err(|e| self.io_error(e))?;

        debug!(pid, path = %self.path.display(), "PID recorded");
        Ok(())
    }

    /// Read the recorded PID.
    ///
    /// `Ok(None)` when there is no record. `CorruptPidRecord` when the file
    /// exists but does not hold a positive decimal PID; callers treat that as
    /// "no process" and [`clear`](Self::clear) the file.
    pub fn read(&self) -> Result<Option<u32>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        match content.trim().parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(Some(pid)),
            _ => Err(AgentError::CorruptPidRecord {
                path: self.path.clone(),
                content,
            }),
        }
    }

    /// Delete the record. Clearing an absent record is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "PID record cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Clear the record only if it still names `pid`.
    ///
    /// Returns whether a record was removed. A record written by a later
    /// `start` is left alone.
    pub fn clear_if_matches(&self, pid: u32) -> Result<bool> {
        match self.read() {
            Ok(Some(recorded)) if recorded == pid => {
                self.clear()?;
                info!(pid, "PID record cleared after process exit");
                Ok(true)
            }
            Ok(Some(recorded)) => {
                debug!(pid, recorded, "PID record belongs to another process; keeping it");
                Ok(false)
            }
            Ok(None) => Ok(false),
            Err(AgentError::CorruptPidRecord { .. }) => {
                self.clear()?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Modification time of the record, i.e. when the process was recorded.
    pub fn started_at(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn io_error(&self, source: io::Error) -> AgentError {
        AgentError::PidStoreIo {
            path: self.path.clone(),
            pid: None,
            source,
        }
    }
}
