// src/exec/launcher.rs

//! How an artifact is turned into a command line, and the check that the
//! runtime behind it is installed.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{AgentError, Result};

/// Oldest Java major version the generated projects target.
pub const RECOMMENDED_JAVA_MAJOR: u32 = 17;

/// Matches `version "21.0.2"` and `version "1.8.0_392"` in `java -version` output.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"version "(\d+)(?:\.(\d+))?"#).expect("static regex is valid")
});

/// Program and fixed arguments used to run an artifact.
///
/// The final command line is `program args... <artifact> <extra args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Arguments that make `program` print its version and exit 0.
    pub version_args: Vec<OsString>,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::java("java")
    }
}

impl Launcher {
    /// `<java> -jar <artifact>`, version checked with `<java> -version`.
    pub fn java(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: vec!["-jar".into()],
            version_args: vec!["-version".into()],
        }
    }

    /// Run artifacts with `program <artifact>` and no version probe arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            version_args: Vec::new(),
        }
    }

    pub fn with_version_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.version_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Build the command that runs `artifact` with `extra` arguments.
    pub fn command(&self, artifact: &Path, extra: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(artifact).args(extra);
        cmd
    }

    /// Human-readable rendering of [`command`](Self::command) for logs.
    pub fn render(&self, artifact: &Path, extra: &[String]) -> String {
        let mut parts = vec![self.program_name()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.push(artifact.display().to_string());
        parts.extend(extra.iter().cloned());
        parts.join(" ")
    }

    /// Check that the runtime can be executed.
    ///
    /// Fails with `RuntimeMissing` when the program cannot be started or its
    /// version probe exits non-zero. An old or unrecognised version is only
    /// logged.
    pub async fn check_runtime(&self) -> Result<RuntimeInfo> {
        let output = Command::new(&self.program)
            .args(&self.version_args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AgentError::RuntimeMissing {
                program: self.program_name(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(AgentError::RuntimeMissing {
                program: self.program_name(),
                detail: format!("version check exited with {}", output.status),
            });
        }

        // `java -version` prints to stderr; other runtimes use stdout.
        let mut banner = String::from_utf8_lossy(&output.stderr).into_owned();
        banner.push_str(&String::from_utf8_lossy(&output.stdout));
        let info = RuntimeInfo::from_banner(&banner);

        match info.major {
            Some(major) if major >= RECOMMENDED_JAVA_MAJOR => {
                info!(program = %self.program_name(), major, "runtime found");
            }
            Some(major) => {
                warn!(
                    program = %self.program_name(),
                    major,
                    "runtime is older than Java {RECOMMENDED_JAVA_MAJOR}; 17+ is recommended"
                );
            }
            None => {
                debug!(program = %self.program_name(), "runtime version not recognised");
            }
        }

        Ok(info)
    }
}

/// What the version probe reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Java major version (`8` for `1.8.0`), if one could be parsed.
    pub major: Option<u32>,
    /// First line of the probe output.
    pub banner: String,
}

impl RuntimeInfo {
    pub fn from_banner(output: &str) -> Self {
        let major = VERSION_RE.captures(output).and_then(|caps| {
            let first: u32 = caps.get(1)?.as_str().parse().ok()?;
            if first == 1 {
                caps.get(2).and_then(|m| m.as_str().parse().ok())
            } else {
                Some(first)
            }
        });

        Self {
            major,
            banner: output.lines().next().unwrap_or_default().trim().to_string(),
        }
    }
}
