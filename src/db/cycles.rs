use crate::errors::StoreError;
use rusqlite::{params, Connection};

// Bookkeeping only. The listings table stays the source of truth for
// dedup and notification state; a failure to record a run is logged by
// the caller and otherwise ignored.

pub fn start_cycle_run(conn: &Connection, now: i64) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO cycle_runs (started_at, success) VALUES (?, 0)",
        params![now],
    )
    .map_err(|e| StoreError::Db(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn end_cycle_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    candidates: usize,
    new_listings: usize,
    notified: usize,
    expired: usize,
    success: bool,
    error: Option<String>,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE cycle_runs SET finished_at = ?, candidates_seen = ?, new_listings = ?, notified = ?, expired = ?, success = ?, error_message = ? WHERE id = ?",
        params![now, candidates, new_listings, notified, expired, success, error, run_id],
    ).map_err(|e| StoreError::Db(e.to_string()))?;
    Ok(())
}
