#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agent_runtime::exec::Launcher;
use agent_runtime::supervisor::SupervisorSettings;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// Builder for runtime config JSON to simplify test setup.
pub struct ConfigBuilder {
    values: Map<String, Value>,
}

impl ConfigBuilder {
    /// A config with every required key and a valid framework.
    pub fn new(name: &str) -> Self {
        let mut values = Map::new();
        values.insert("name".into(), json!(name));
        values.insert("version".into(), json!("1.0.0"));
        values.insert("framework".into(), json!("SPRING_AI_ALIBABA_GRAPH"));
        values.insert("types".into(), json!("YAML"));
        Self { values }
    }

    pub fn framework(self, framework: &str) -> Self {
        self.with("framework", json!(framework))
    }

    pub fn port(self, port: u16) -> Self {
        self.with("port", json!(port))
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.values.remove(key);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.values).expect("config serializes")
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.to_json()).expect("write config");
    }
}

/// Launcher that runs artifacts as shell scripts and always passes the
/// runtime check.
pub fn shell_launcher() -> Launcher {
    Launcher::new("sh").with_version_args(["-c", "echo 'openjdk version \"21.0.2\" 2024-01-16' >&2"])
}

/// A throwaway project directory with the supervisor's well-known layout.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Settings rooted in this project, running artifacts with `sh` and a
    /// short connect timeout.
    pub fn settings(&self) -> SupervisorSettings {
        SupervisorSettings {
            launcher: shell_launcher(),
            connect_timeout: Duration::from_millis(500),
            ..SupervisorSettings::rooted_at(self.root())
        }
    }

    pub fn with_config(self, config: ConfigBuilder) -> Self {
        config.write_to(&self.path("runtime.config.json"));
        self
    }

    /// Put a shell script named `name` into the build directory.
    pub fn with_artifact(self, name: &str, script: &str) -> Self {
        let target = self.path("target");
        fs::create_dir_all(&target).expect("create target dir");
        fs::write(target.join(name), script).expect("write artifact");
        self
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write file");
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
