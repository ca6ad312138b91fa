// src/config/mod.rs

//! Runtime config loading and validation.
//!
//! Responsibilities:
//! - Define the JSON-backed data model (`model.rs`).
//! - Load config files from disk and discover them for `list` (`loader.rs`).
//! - Check required keys and the framework enum (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    CONFIG_FILE_PATTERN, default_config_path, discover_configs, load_and_validate, load_from_fs,
    load_from_path, render_config,
};
pub use model::{RawConfig, RuntimeConfig};
pub use validate::validate_config;
