//! Single-file slot: the blob is the whole file.

use std::{fs, io, path::PathBuf};

use tracing::debug;

use super::{PersistResult, Slot};

/// Slot stored as one file. Writes land in a sibling temp file and are then
/// renamed over the target.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Uses `path` as the slot; parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Slot for FileSlot {
    fn read(&self) -> PersistResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, blob: &str) -> PersistResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = blob.len(), "file slot written");
        Ok(())
    }
}
