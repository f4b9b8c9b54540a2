use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

use crate::{LedgerError, LedgerResult};

/// Key under which the ledger snapshot is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "smart_expenses_v1";

/// Abstraction over key-value blob stores able to hold a serialized snapshot.
///
/// `write` must be atomic from the caller's point of view: after it returns,
/// readers observe either the previous value or the new one in full.
pub trait BlobStore: Send + Sync {
    fn read(&self, key: &str) -> LedgerResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> LedgerResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Arc<S> {
    fn read(&self, key: &str) -> LedgerResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> LedgerResult<()> {
        (**self).write(key, value)
    }
}

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> LedgerResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> LedgerResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
