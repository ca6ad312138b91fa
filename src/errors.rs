// src/errors.rs

//! Crate-wide error type and remediation hints.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("config file {} is not valid JSON: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config validation failed: {0}")]
    ConfigInvalid(String),

    #[error("runtime `{program}` is not available: {detail}")]
    RuntimeMissing { program: String, detail: String },

    #[error("no runnable artifact found: {0}")]
    ArtifactNotFound(String),

    #[error("failed to start `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PID file {} could not be accessed: {source}", .path.display())]
    PidStoreIo {
        path: PathBuf,
        /// Set when a child had already been started and was killed because
        /// its PID could not be recorded.
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
    },

    #[error("PID file {} is corrupt: {content:?}", .path.display())]
    CorruptPidRecord { path: PathBuf, content: String },

    #[error("could not signal process {pid}: {source}")]
    SignalFailed {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AgentError {
    /// A short remediation hint to print after the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AgentError::ConfigNotFound(_) => {
                Some("create a project with a runtime.config.json, or pass the config path explicitly")
            }
            AgentError::ConfigParse { .. } | AgentError::ConfigInvalid(_) => Some(
                "required keys are name, version, framework, types; framework is one of SPRING_AI_ALIBABA_GRAPH, LANGGRAPH4J, ADK_JAVA",
            ),
            AgentError::RuntimeMissing { .. } => {
                Some("install Java 17+ and make sure it is on PATH, or pass --java")
            }
            AgentError::ArtifactNotFound(_) => {
                Some("build the project first (e.g. `mvn clean package`)")
            }
            AgentError::PidStoreIo { .. } => {
                Some("check that the working directory is writable")
            }
            AgentError::SignalFailed { .. } => {
                Some("the process may belong to another user; stop it manually")
            }
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AgentError>;
