// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::Glob;

pub mod mock;

/// Abstract filesystem interface for the read-only lookups the supervisor does
/// (config files, build output).
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }
}

/// List the regular files directly inside `dir` whose file name matches
/// `pattern`, sorted by file name.
///
/// Subdirectories are not searched. A missing `dir` yields an empty list.
pub fn match_files(fs: &dyn FileSystem, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("invalid glob pattern {pattern:?}"))?
        .compile_matcher();

    if !fs.is_dir(dir) {
        return Ok(Vec::new());
    }

    let mut matches: Vec<PathBuf> = fs
        .read_dir(dir)
        .with_context(|| format!("reading dir {}", dir.display()))?
        .into_iter()
        .filter(|path| fs.is_file(path))
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .collect();

    matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(matches)
}
