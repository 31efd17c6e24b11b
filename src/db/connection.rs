use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::StoreError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot, keyed by path so a thread asking for a
// different database gets a fresh connection instead of someone else's.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = RefCell::new(None);
}

#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Run the closure against a cached per-thread connection. The
    /// monitor opens one on-disk database for the life of the process;
    /// tests point each thread at its own `:memory:` database, and the
    /// slot reopens if a different path is requested on the same thread.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let reopen = match slot.as_ref() {
                    Some((path, _)) => path != &self.path,
                    None => true,
                };
                if reopen {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| StoreError::Db(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }
                let (_, conn) = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| StoreError::Internal)?;
        inner_result
    }
}

/// Apply the embedded schema. Safe to call on every startup; existing
/// rows survive re-initialization.
pub fn init_db(db: &Database) -> Result<(), StoreError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::Db(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    println!("✅ Database initialized");
    Ok(())
}
