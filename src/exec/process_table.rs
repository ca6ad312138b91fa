// src/exec/process_table.rs

//! Access to the OS process table.
//!
//! The supervisor never holds a handle to a process started by an earlier
//! invocation; all it has is a PID. [`ProcessTable`] is the seam through which
//! it asks whether that PID exists and delivers signals, so tests can swap in
//! a fake that never touches real processes.

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// Trait abstracting PID existence checks and signal delivery.
pub trait ProcessTable: Send + Sync {
    /// Whether a process with this PID currently exists.
    fn exists(&self, pid: u32) -> bool;

    /// Deliver `signal` to `pid`.
    fn send(&self, pid: u32, signal: Signal) -> nix::Result<()>;
}

/// Process table backed by `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcessTable;

impl ProcessTable for RealProcessTable {
    fn exists(&self, pid: u32) -> bool {
        let Some(pid) = to_pid(pid) else {
            return false;
        };
        // Signal 0 performs the permission and existence checks only. EPERM
        // means the process is there but owned by someone else.
        match kill(pid, None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    fn send(&self, pid: u32, signal: Signal) -> nix::Result<()> {
        let pid = to_pid(pid).ok_or(Errno::EINVAL)?;
        kill(pid, signal)
    }
}

/// PIDs 0 and anything above `i32::MAX` would address process groups or
/// nothing at all, never a single process.
fn to_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|p| *p > 0)
        .map(Pid::from_raw)
}
