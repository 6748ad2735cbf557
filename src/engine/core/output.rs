// Output area: the directory a run owns exclusively

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem operations needed to reset the output area
pub trait OutputFs {
    fn exists(&self, path: &Path) -> bool;

    /// Direct children of `dir`, each paired with whether it is a directory
    fn entries(&self, dir: &Path) -> Result<Vec<(PathBuf, bool)>>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl OutputFs for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn entries(&self, dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            // file_type() does not follow links: a symlinked dir is removed as a file
            let is_dir = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", entry.path().display()))?
                .is_dir();
            entries.push((entry.path(), is_dir));
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).with_context(|| format!("Failed to delete {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
    }
}

/// Leave `path` as an existing, empty directory
///
/// Existing children are deleted (directories recursively); a missing
/// directory is created with its parents. The first deletion error aborts
/// the reset.
pub fn reset_output_dir(fs: &dyn OutputFs, path: &Path) -> Result<()> {
    if !fs.exists(path) {
        debug!(path = %path.display(), "creating output directory");
        return fs.create_dir_all(path);
    }

    for (entry, is_dir) in fs.entries(path)? {
        if is_dir {
            fs.remove_dir_all(&entry)?;
        } else {
            fs.remove_file(&entry)?;
        }
    }
    debug!(path = %path.display(), "output directory cleared");

    Ok(())
}
