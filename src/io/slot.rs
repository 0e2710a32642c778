use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

/// Error type for durable slot I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize state: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single durable key-value slot holding the serialized payload.
pub trait StorageSlot {
    /// The stored blob, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    /// Replace the stored blob in one write.
    fn write(&mut self, contents: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File slot
// ---------------------------------------------------------------------------

/// Slot backed by `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        FileSlot {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Stages the blob in a sibling temp file and renames it over the slot,
    /// so a reader never sees a half-written payload.
    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        let replace = || -> io::Result<()> {
            let dir = self.path.parent().unwrap_or(Path::new("."));
            fs::create_dir_all(dir)?;
            let mut staged = NamedTempFile::new_in(dir)?;
            staged.write_all(contents.as_bytes())?;
            staged.as_file().sync_all()?;
            staged.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        };
        replace().map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Memory slot
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryCell {
    value: Option<String>,
    fail_writes: bool,
}

/// In-memory slot. Clones share the same cell, so a clone kept outside a
/// store can inspect or replace what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    cell: Rc<RefCell<MemoryCell>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        let slot = Self::new();
        slot.cell.borrow_mut().value = Some(contents.to_string());
        slot
    }

    pub fn contents(&self) -> Option<String> {
        self.cell.borrow().value.clone()
    }

    /// Replace the blob directly, bypassing any store.
    pub fn set_contents(&self, contents: &str) {
        self.cell.borrow_mut().value = Some(contents.to_string());
    }

    /// Make subsequent writes fail (quota exceeded, storage disabled).
    pub fn set_fail_writes(&self, fail: bool) {
        self.cell.borrow_mut().fail_writes = fail;
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.cell.borrow().value.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        let mut cell = self.cell.borrow_mut();
        if cell.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        cell.value = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_slot_missing_reads_none() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path(), "markers");
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn file_slot_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(&dir.path().join("nested"), "markers");
        slot.write("{\"a\":1}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(slot.path().ends_with("nested/markers.json"));
    }

    #[test]
    fn file_slot_overwrites_whole_blob() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(dir.path(), "markers");
        slot.write("a long first value").unwrap();
        slot.write("short").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn memory_slot_clones_share_contents() {
        let slot = MemorySlot::new();
        let mut writer = slot.clone();
        writer.write("x").unwrap();
        assert_eq!(slot.contents().as_deref(), Some("x"));
    }

    #[test]
    fn memory_slot_failure_keeps_previous_value() {
        let mut slot = MemorySlot::with_contents("old");
        slot.set_fail_writes(true);
        assert!(matches!(slot.write("new"), Err(StoreError::Unavailable(_))));
        assert_eq!(slot.contents().as_deref(), Some("old"));
    }
}
