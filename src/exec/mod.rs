// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the artifact, using
//! `tokio::process::Command`, and for talking to processes started by earlier
//! invocations.
//!
//! - [`launcher`] turns an artifact into a command line and checks that the
//!   runtime (Java by default) is installed.
//! - [`spawner`] runs the command in the foreground or detached, with the
//!   detached variant recording the PID atomically with the start.
//! - [`reaper`] is the background task that waits for a detached child and
//!   clears its PID record.
//! - [`process_table`] provides the `ProcessTable` trait and the `kill(2)`
//!   backed `RealProcessTable`; tests can replace it with a fake.

pub mod launcher;
pub mod process_table;
pub mod reaper;
pub mod spawner;

pub use launcher::{Launcher, RuntimeInfo};
pub use process_table::{ProcessTable, RealProcessTable};
pub use reaper::spawn_reaper;
pub use spawner::{DetachedProcess, LogSink, ProcessSpawner, SpawnResult};
