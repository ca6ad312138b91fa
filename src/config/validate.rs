// src/config/validate.rs

use serde_json::Value;
use tracing::warn;

use crate::config::model::{REQUIRED_KEYS, RawConfig, RuntimeConfig};
use crate::errors::{AgentError, Result};
use crate::types::Framework;

impl TryFrom<RawConfig> for RuntimeConfig {
    type Error = AgentError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        ensure_required_keys(&raw)?;
        let framework = parse_framework(&raw)?;
        let config = RuntimeConfig::new_unchecked(raw.values, framework);
        warn_on_unusable_port(&config);
        Ok(config)
    }
}

/// Validate a raw config without keeping the result.
pub fn validate_config(raw: &RawConfig) -> Result<()> {
    RuntimeConfig::try_from(raw.clone()).map(|_| ())
}

fn ensure_required_keys(raw: &RawConfig) -> Result<()> {
    for key in REQUIRED_KEYS {
        if !raw.values.contains_key(key) {
            return Err(AgentError::ConfigInvalid(format!(
                "missing required field: {key}"
            )));
        }
    }
    Ok(())
}

fn parse_framework(raw: &RawConfig) -> Result<Framework> {
    // A non-string framework is reported the same way as an unknown name.
    let value = raw
        .values
        .get("framework")
        .and_then(Value::as_str)
        .unwrap_or_default();
    value.parse().map_err(AgentError::ConfigInvalid)
}

/// `port` is optional and never fails validation. A value that is not a TCP
/// port is ignored in favour of the default.
fn warn_on_unusable_port(config: &RuntimeConfig) {
    if let Some(value) = config.get("port") {
        if config.port().is_none() {
            warn!(port = %value, "config port is not a usable TCP port; ignoring it");
        }
    }
}
