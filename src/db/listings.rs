use crate::domain::Listing;
use crate::errors::StoreError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// Insert a candidate unless its URL is already stored.
///
/// The returned flag comes from the changed-row count of the
/// conflict-free insert and is the single signal for "first time we've
/// seen this listing". Notification decisions hang off it; there is no
/// separate existence check to get out of sync with.
pub fn insert_listing(conn: &Connection, listing: &Listing) -> Result<bool, StoreError> {
    let rows = conn
        .execute(
            r#"
            INSERT INTO listings (title, price, city, posted, listing_url)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(listing_url) DO NOTHING
            "#,
            params![
                listing.title,
                listing.price,
                listing.city,
                listing.posted,
                listing.listing_url
            ],
        )
        .map_err(|e| StoreError::Db(e.to_string()))?;

    Ok(rows > 0)
}

/// Record that an alert went out for this URL.
pub fn mark_notified(conn: &Connection, listing_url: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE listings SET notified = 1 WHERE listing_url = ?",
        params![listing_url],
    )
    .map_err(|e| StoreError::Db(e.to_string()))?;
    Ok(())
}

/// Delete every row posted before the cutoff, notified or not.
/// Returns how many rows went away.
pub fn expire_older_than(conn: &Connection, cutoff: NaiveDateTime) -> Result<usize, StoreError> {
    let rows = conn
        .execute("DELETE FROM listings WHERE posted < ?", params![cutoff])
        .map_err(|e| StoreError::Db(e.to_string()))?;
    Ok(rows)
}

pub fn count_listings(conn: &Connection) -> Result<i64, StoreError> {
    conn.query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))
        .map_err(|e| StoreError::Db(e.to_string()))
}
