//! On-disk cache of result snapshots keyed by run label.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::evaluation::ResultSnapshot;
use crate::{Error, Result};

/// File name of a cached snapshot inside its label directory.
const RESULTS_FILE: &str = "results.json";

/// Cache of evaluated snapshots.
///
/// Each run label owns a directory under the cache root:
/// ```text
/// <root>/<label>/results.json
/// ```
/// A cached snapshot is returned as-is, so repeated invocations skip the
/// evaluation entirely.
#[derive(Debug, Clone)]
pub struct ResultCache {
    root: PathBuf,
}

impl ResultCache {
    /// Create a cache rooted at `root`. Nothing is created on disk until
    /// [`store`](Self::store) is called.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file for `label`.
    pub fn path_for(&self, label: &str) -> Result<PathBuf> {
        if label.is_empty() || label.contains(['/', '\\']) || label == "." || label == ".." {
            return Err(Error::InvalidConfig(format!(
                "run label '{}' cannot be used as a cache directory",
                label
            )));
        }
        Ok(self.root.join(label).join(RESULTS_FILE))
    }

    /// Whether a snapshot is cached for `label`.
    pub fn contains(&self, label: &str) -> bool {
        self.path_for(label).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Load the cached snapshot for `label`, `None` on a cache miss.
    pub fn load(&self, label: &str) -> Result<Option<ResultSnapshot>> {
        let path = self.path_for(label)?;
        if !path.is_file() {
            debug!(label, path = %path.display(), "result cache miss");
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to open cached results '{}': {}", path.display(), e),
            ))
        })?;
        let snapshot = serde_json::from_reader(BufReader::new(file))?;

        info!(label, path = %path.display(), "loaded saved results");
        Ok(Some(snapshot))
    }

    /// Persist `snapshot` under `label`, replacing any previous entry.
    ///
    /// # Returns
    /// The path of the written file.
    pub fn store(&self, label: &str, snapshot: &ResultSnapshot) -> Result<PathBuf> {
        let path = self.path_for(label)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::IoError(std::io::Error::new(
                    e.kind(),
                    format!("failed to create cache directory '{}': {}", dir.display(), e),
                ))
            })?;
        }

        let file = File::create(&path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to create cache file '{}': {}", path.display(), e),
            ))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;

        debug!(label, path = %path.display(), "stored results");
        Ok(path)
    }
}
