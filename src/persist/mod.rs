/// JSON encoding of the calendar mapping.
pub mod codec;
/// Single JSON file slot.
pub mod file;
/// In-process slot.
pub mod memory;
/// SQLite key-value slot.
pub mod sqlite;

use thiserror::Error;

/// Key under which the calendar blob is stored unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "events";

/// Slot read/write failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite backend error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Filesystem error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Mapping could not be encoded.
    #[error("encode: {0}")]
    Serde(#[from] serde_json::Error),
    /// Anything else.
    #[error("{0}")]
    Message(String),
}

/// Result alias for slot operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// One durable key-value entry holding the serialized calendar.
pub trait Slot: Send {
    /// Returns the stored blob, or `None` when nothing was ever written.
    fn read(&self) -> PersistResult<Option<String>>;
    /// Replaces the stored blob.
    fn write(&mut self, blob: &str) -> PersistResult<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn read(&self) -> PersistResult<Option<String>> {
        (**self).read()
    }

    fn write(&mut self, blob: &str) -> PersistResult<()> {
        (**self).write(blob)
    }
}
