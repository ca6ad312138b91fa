// src/config/loader.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::config::model::{RawConfig, RuntimeConfig};
use crate::errors::{AgentError, Result};
use crate::fs::{FileSystem, RealFileSystem, match_files};

/// File name pattern `list` uses to discover configs.
pub const CONFIG_FILE_PATTERN: &str = "runtime.config*.json";

/// Load a config file and return the raw `RawConfig`.
///
/// This only performs JSON deserialization; it does **not** check required
/// keys or the framework. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    load_from_fs(&RealFileSystem, path.as_ref())
}

/// Like [`load_from_path`], reading through the given filesystem.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawConfig> {
    if !fs.exists(path) {
        return Err(AgentError::ConfigNotFound(path.to_path_buf()));
    }
    let contents = fs.read_to_string(path)?;

    serde_json::from_str(&contents).map_err(|source| AgentError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a config file from path and validate it.
///
/// This is the entry point `start` uses:
///
/// - Fails with `ConfigNotFound` when the file is absent.
/// - Fails with `ConfigParse` when it is not a JSON object.
/// - Fails with `ConfigInvalid` when a required key is missing or the
///   framework is not recognised.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let raw = load_from_path(path)?;
    RuntimeConfig::try_from(raw)
}

/// Every config file in `dir` matching [`CONFIG_FILE_PATTERN`] that loads and
/// validates, sorted by file name. Files that fail are skipped.
pub fn discover_configs(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<(PathBuf, RuntimeConfig)>> {
    let candidates = match_files(fs, dir, CONFIG_FILE_PATTERN)?;
    debug!(count = candidates.len(), dir = %dir.display(), "config candidates");

    let mut configs = Vec::with_capacity(candidates.len());
    for path in candidates {
        match load_from_fs(fs, &path).and_then(RuntimeConfig::try_from) {
            Ok(cfg) => configs.push((path, cfg)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping config");
            }
        }
    }
    Ok(configs)
}

/// Pretty-printed JSON of the config at `path`, or `None` when the file does
/// not exist. The content is shown as written, without validation.
pub fn render_config(path: impl AsRef<Path>) -> Result<Option<String>> {
    let raw = match load_from_path(path) {
        Ok(raw) => raw,
        Err(AgentError::ConfigNotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    let pretty = serde_json::to_string_pretty(&raw.values).context("rendering config")?;
    Ok(Some(pretty))
}

/// Default config path: `runtime.config.json` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("runtime.config.json")
}
