use super::backend::StorageBackend;
use crate::error::{BoardError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Entries as pretty-printed JSON files, one per key, under a data directory.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(BoardError::Store(format!("Invalid entry key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BoardError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_entry(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(BoardError::Io)?;
        debug!("read {} ({} bytes)", path.display(), content.len());
        Ok(Some(content))
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        let target = self.entry_path(key)?;
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(BoardError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(BoardError::Io(e));
        }

        debug!("wrote {} ({} bytes)", target.display(), value.len());
        Ok(())
    }

    fn remove_entry(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(BoardError::Io)?;
            debug!("removed {}", path.display());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
