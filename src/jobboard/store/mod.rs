//! # Storage Layer
//!
//! The durable mirror behind every store. The three stores (identity, documents,
//! registry) keep their state in memory and write it through a
//! [`StorageBackend`], which is nothing more than a string key-value store.
//!
//! ## Entries
//!
//! Each key holds one JSON document:
//!
//! ```text
//! <data dir>/
//! ├── session.json        # current User (absent when signed out)
//! ├── users.json          # id -> CredentialRecord (hashed passwords)
//! ├── documents.json      # id -> Document
//! ├── jobs.json           # id -> JobPosting
//! ├── applications.json   # id -> Application
//! └── config.json         # BoardConfig
//! ```
//!
//! Maps are `BTreeMap`s keyed by time-ordered ids, so serialization order is
//! creation order and survives a reload.
//!
//! ## Write Ordering
//!
//! Stores build the next state on a copy, write it here, and only then swap it
//! into memory. A failed write therefore leaves memory at the last committed
//! state. Backends must make a single `write_entry` atomic.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per entry, temp-file-and-rename writes.
//! - [`mem_backend::MemBackend`]: shared in-memory map for tests.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;

/// The durable entries the board knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    Session,
    Users,
    Documents,
    Jobs,
    Applications,
}

impl Entry {
    pub fn key(&self) -> &'static str {
        match self {
            Entry::Session => "session",
            Entry::Users => "users",
            Entry::Documents => "documents",
            Entry::Jobs => "jobs",
            Entry::Applications => "applications",
        }
    }
}

/// Reads and deserializes an entry. Missing entries are `Ok(None)`.
pub fn load<T: DeserializeOwned, B: StorageBackend>(
    backend: &B,
    entry: Entry,
) -> Result<Option<T>> {
    match backend.read_entry(entry.key())? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Like [`load`], but an absent entry yields `T::default()`.
pub fn load_or_default<T, B>(backend: &B, entry: Entry) -> Result<T>
where
    T: DeserializeOwned + Default,
    B: StorageBackend,
{
    Ok(load(backend, entry)?.unwrap_or_default())
}

pub fn save<T: Serialize, B: StorageBackend>(backend: &B, entry: Entry, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    backend.write_entry(entry.key(), &raw)
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_entry_loads_as_none() {
        let backend = MemBackend::new();
        let loaded: Option<BTreeMap<String, String>> = load(&backend, Entry::Jobs).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn saved_entry_loads_back() {
        let backend = MemBackend::new();
        let mut map = BTreeMap::new();
        map.insert("job_1".to_string(), "Rust dev".to_string());
        save(&backend, Entry::Jobs, &map).unwrap();

        let loaded: BTreeMap<String, String> = load_or_default(&backend, Entry::Jobs).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn corrupt_entry_is_a_serialization_error() {
        let backend = MemBackend::new();
        backend.write_entry("jobs", "{not json").unwrap();
        let loaded: Result<Option<BTreeMap<String, String>>> = load(&backend, Entry::Jobs);
        assert!(matches!(
            loaded,
            Err(crate::error::BoardError::Serialization(_))
        ));
    }
}
