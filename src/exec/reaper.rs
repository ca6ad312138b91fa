// src/exec/reaper.rs

//! Background task that waits for a detached child and reconciles the PID
//! record once it exits.

use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::exec::spawner::LogSink;
use crate::supervisor::pid_store::PidStore;

/// Spawn the reaper for a freshly started detached child.
///
/// The task owns the child handle and the log sink. It waits for the child
/// to terminate by any means, closes the sink, and clears the PID record if
/// it still names this child. The join handle yields the child's exit code,
/// or `None` when it was killed by a signal. If waiting itself fails the
/// record is left for the liveness checks and the handle also yields `None`.
///
/// The reaper lives inside the launching process. If that process exits
/// first, the record is reconciled later by `status` or `health`.
pub fn spawn_reaper(mut child: Child, pid: u32, log: LogSink, store: PidStore) -> JoinHandle<Option<i32>> {
    tokio::spawn(async move {
        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                // Without an exit we cannot tell whether the record is stale.
                error!(pid, error = %e, "failed waiting for detached process");
                return None;
            }
        };

        info!(
            pid,
            exit_code = ?status.code(),
            success = status.success(),
            "detached process exited"
        );
        drop(log);

        if let Err(e) = store.clear_if_matches(pid) {
            warn!(pid, error = %e, "could not clear PID record after exit");
        }

        status.code()
    })
}
