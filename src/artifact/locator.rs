// src/artifact/locator.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{AgentError, Result};
use crate::fs::{FileSystem, match_files};

/// Substring that marks an artifact as a test bundle.
const TEST_MARKER: &str = "test";

/// Finds the runnable artifact inside a build-output directory.
#[derive(Debug)]
pub struct ArtifactLocator<'a> {
    fs: &'a dyn FileSystem,
    build_dir: PathBuf,
}

impl<'a> ArtifactLocator<'a> {
    pub fn new(fs: &'a dyn FileSystem, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            build_dir: build_dir.into(),
        }
    }

    /// Resolve the artifact to run for `glob` (e.g. `*.jar`).
    ///
    /// Candidates are enumerated in file-name order. The first one whose name
    /// does not contain `"test"` wins; if every candidate does, the first
    /// candidate is returned. This is a naming heuristic: an application jar
    /// that happens to contain "test" in its name loses to any other match.
    pub fn locate(&self, glob: &str) -> Result<PathBuf> {
        let candidates = match_files(self.fs, &self.build_dir, glob)
            .map_err(|e| AgentError::ArtifactNotFound(format!("{e:#}")))?;

        debug!(
            build_dir = %self.build_dir.display(),
            glob,
            candidates = ?candidates,
            "artifact candidates"
        );

        pick_candidate(&candidates).cloned().ok_or_else(|| {
            AgentError::ArtifactNotFound(format!(
                "nothing matches {glob} in {}",
                self.build_dir.display()
            ))
        })
    }
}

/// Apply the tie-break rule to an already ordered candidate list.
pub fn pick_candidate(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates
        .iter()
        .find(|path| !is_test_artifact(path))
        .or_else(|| candidates.first())
}

fn is_test_artifact(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(TEST_MARKER))
        .unwrap_or(false)
}
