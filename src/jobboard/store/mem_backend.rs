use super::backend::StorageBackend;
use crate::error::{BoardError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Default)]
struct MemInner {
    entries: RefCell<HashMap<String, String>>,
    failing_keys: RefCell<HashSet<String>>,
    fail_all_writes: RefCell<bool>,
}

/// In-memory storage backend for testing.
///
/// Uses `Rc<RefCell<..>>` since the board is single-threaded. Clones share the
/// same entries, which is how several stores (or a reopened board) see one
/// another's writes.
#[derive(Clone, Default)]
pub struct MemBackend {
    inner: Rc<MemInner>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write and remove fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.inner.fail_all_writes.borrow_mut() = simulate;
    }

    /// Make writes to one key fail, leaving the others working.
    pub fn fail_writes_to(&self, key: &str) {
        self.inner.failing_keys.borrow_mut().insert(key.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.entries.borrow().get(key).cloned()
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if *self.inner.fail_all_writes.borrow() || self.inner.failing_keys.borrow().contains(key) {
            return Err(BoardError::Store(format!(
                "Simulated write error for '{}'",
                key
            )));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read_entry(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.entries.borrow().get(key).cloned())
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.inner
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_entry(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.inner.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let backend = MemBackend::new();
        let other = backend.clone();
        backend.write_entry("jobs", "{}").unwrap();
        assert_eq!(other.read_entry("jobs").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn failing_key_rejects_writes_only_for_that_key() {
        let backend = MemBackend::new();
        backend.fail_writes_to("jobs");
        assert!(backend.write_entry("jobs", "{}").is_err());
        assert!(backend.write_entry("applications", "{}").is_ok());
    }

    #[test]
    fn remove_missing_entry_is_ok() {
        let backend = MemBackend::new();
        backend.remove_entry("session").unwrap();
        assert!(backend.read_entry("session").unwrap().is_none());
    }
}
