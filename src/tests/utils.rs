use crate::db::connection::{init_db, Database};
use crate::domain::Listing;
use chrono::NaiveDateTime;

/// Fresh in-memory DB with the production schema applied. Each test
/// thread gets its own connection, so tests stay isolated.
pub fn init_test_db() -> Database {
    let db = Database::new(":memory:");

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn listing(url: &str, price: &str, posted: NaiveDateTime) -> Listing {
    Listing {
        title: "Couch".to_string(),
        price: price.to_string(),
        city: "Charlotte".to_string(),
        posted,
        listing_url: url.to_string(),
    }
}
