// src/artifact/mod.rs

//! Locating the build artifact the supervisor launches.

pub mod locator;

pub use locator::{ArtifactLocator, pick_candidate};

/// Default build-output directory searched for artifacts.
pub const DEFAULT_BUILD_DIR: &str = "target";

/// Default artifact glob inside the build directory.
pub const DEFAULT_ARTIFACT_GLOB: &str = "*.jar";
