// src/config/model.rs

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::Framework;

/// Keys every runtime config must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["name", "version", "framework", "types"];

/// A runtime config exactly as read from JSON, before validation.
///
/// ```json
/// {
///   "name": "my-agent",
///   "version": "1.0.0",
///   "framework": "SPRING_AI_ALIBABA_GRAPH",
///   "types": "YAML",
///   "schema": "./config/agent.yaml"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawConfig {
    pub values: Map<String, Value>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

/// A validated runtime config.
///
/// The supervisor only interprets `framework` and `port`; every other key is
/// carried through untouched.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    values: Map<String, Value>,
    framework: Framework,
}

impl RuntimeConfig {
    /// Build without validation. Only `validate` should call this.
    pub(crate) fn new_unchecked(values: Map<String, Value>, framework: Framework) -> Self {
        Self { values, framework }
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn name(&self) -> &str {
        self.str_value("name")
    }

    pub fn version(&self) -> &str {
        self.str_value("version")
    }

    /// Optional `port` key; `None` when absent or not a valid TCP port.
    pub fn port(&self) -> Option<u16> {
        self.values
            .get("port")
            .and_then(Value::as_u64)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    fn str_value(&self, key: &str) -> &str {
        self.values.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}
