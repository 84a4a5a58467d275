use crate::error::Result;

/// Abstract interface for raw durable I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while the
/// identity, document and registry stores handle the "what". All methods take
/// `&self`; implementations are cheap handles that the stores clone and share.
pub trait StorageBackend: Clone {
    /// Read the raw JSON for `key`.
    /// Returns Ok(None) if the entry was never written or has been removed.
    fn read_entry(&self, key: &str) -> Result<Option<String>>;

    /// Replace the entry for `key`.
    /// MUST be atomic: readers see either the old value or the new one.
    fn write_entry(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry. Removing a missing entry is not an error.
    fn remove_entry(&self, key: &str) -> Result<()>;

    /// Human readable location of the data (a directory, or a label).
    fn describe(&self) -> String;
}
