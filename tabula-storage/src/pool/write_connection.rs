//! The single write connection. Every mutation and every statement batch
//! runs here, serialized by a mutex: the system assumes exactly one writer.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use tabula_core::errors::{StorageError, TabulaError, TabulaResult};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open (and create if absent) the database file for writing.
    pub fn open(path: &Path) -> TabulaResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> TabulaResult<T>
    where
        F: FnOnce(&Connection) -> TabulaResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| {
            TabulaError::Storage(StorageError::LockPoisoned {
                message: e.to_string(),
            })
        })?;
        f(&guard)
    }
}
