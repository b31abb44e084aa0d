//! In-process slot, shared between clones.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{PersistError, PersistResult, Slot};

#[derive(Debug, Default)]
struct Inner {
    blob: Option<String>,
    failing: bool,
    writes: usize,
}

/// Slot kept in memory. Clones observe the same entry, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let slot = Self::default();
        slot.lock().blob = Some(blob.into());
        slot
    }

    /// Makes every subsequent read and write fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Current blob, bypassing the failure switch.
    pub fn blob(&self) -> Option<String> {
        self.lock().blob.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Poisoning leaves a plain string behind; keep using it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> PersistResult<Option<String>> {
        let inner = self.lock();
        if inner.failing {
            return Err(PersistError::Message("memory slot unavailable".into()));
        }
        Ok(inner.blob.clone())
    }

    fn write(&mut self, blob: &str) -> PersistResult<()> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(PersistError::Message("memory slot unavailable".into()));
        }
        inner.blob = Some(blob.to_string());
        inner.writes += 1;
        Ok(())
    }
}
