//! SQLite-backed key-value slot.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::{debug, warn};

use super::{DEFAULT_SLOT_KEY, PersistError, PersistResult, Slot};

/// One row of the `slots` table, addressed by a fixed key.
pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    /// Opens or creates the database at `path` using the default key.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        Self::open_with_key(path, DEFAULT_SLOT_KEY)
    }

    /// Opens or creates the database at `path`, storing under `key`.
    ///
    /// A file that SQLite does not recognise as a database is renamed to
    /// `<name>.corrupt` and replaced by a fresh, empty database.
    pub fn open_with_key(path: impl AsRef<Path>, key: &str) -> PersistResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), key, "opening sqlite slot");
        match Self::open_file(path, key) {
            Err(PersistError::Sqlite(err)) if is_unreadable(&err) => {
                let aside = corrupt_path(path);
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %err,
                    "sqlite slot unreadable, starting fresh"
                );
                fs::rename(path, &aside)?;
                Self::open_file(path, key)
            }
            other => other,
        }
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, DEFAULT_SLOT_KEY)
    }

    fn open_file(path: &Path, key: &str) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, key)
    }

    fn init_connection(conn: Connection, key: &str) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }
}

impl Slot for SqliteSlot {
    fn read(&self) -> PersistResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, blob: &str) -> PersistResult<()> {
        self.conn.execute(
            "INSERT INTO slots(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, blob],
        )?;
        Ok(())
    }
}

fn is_unreadable(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt)
    )
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("slot"));
    name.push(".corrupt");
    path.with_file_name(name)
}
