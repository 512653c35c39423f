//! File discovery for scan batches
//!
//! Finds the files in a directory whose names match a glob pattern,
//! optionally descending into subdirectories, in a stable path order.

use crate::error::{Result, SplitterError};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for scan batches
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    root: PathBuf,
    pattern: Pattern,
    recurse: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(root: impl Into<PathBuf>, pattern: &str, recurse: bool) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            pattern: Pattern::new(pattern)?,
            recurse,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover all matching files, sorted by path
    ///
    /// Only file names are matched against the pattern, so `*_composite.txt`
    /// finds scans at any depth when recursing.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(SplitterError::InputNotFound {
                path: self.root.clone(),
            });
        }

        let max_depth = if self.recurse { usize::MAX } else { 1 };
        debug!(
            "Searching {} for '{}' (recurse: {})",
            self.root.display(),
            self.pattern,
            self.recurse
        );

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(max_depth) {
            let entry = entry?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} matching files", files.len());

        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.matches(name))
    }
}
