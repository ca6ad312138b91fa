use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use agent_runtime::exec::ProcessTable;
use nix::errno::Errno;
use nix::sys::signal::Signal;

/// A fake process table that:
/// - reports the PIDs it was told about as existing
/// - records every signal sent, in order
/// - answers each signal with a scripted result (default: success, and a
///   delivered SIGTERM/SIGKILL removes the PID)
#[derive(Debug, Clone, Default)]
pub struct FakeProcessTable {
    alive: Arc<Mutex<HashSet<u32>>>,
    sent: Arc<Mutex<Vec<(u32, Signal)>>>,
    failures: Arc<Mutex<HashMap<Signal, Errno>>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(self, pid: u32) -> Self {
        self.alive.lock().unwrap().insert(pid);
        self
    }

    /// Make every delivery of `signal` fail with `errno`.
    pub fn failing(self, signal: Signal, errno: Errno) -> Self {
        self.failures.lock().unwrap().insert(signal, errno);
        self
    }

    pub fn sent(&self) -> Vec<(u32, Signal)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ProcessTable for FakeProcessTable {
    fn exists(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains(&pid)
    }

    fn send(&self, pid: u32, signal: Signal) -> nix::Result<()> {
        self.sent.lock().unwrap().push((pid, signal));

        if let Some(errno) = self.failures.lock().unwrap().get(&signal) {
            return Err(*errno);
        }
        if !self.alive.lock().unwrap().remove(&pid) {
            return Err(Errno::ESRCH);
        }
        Ok(())
    }
}
