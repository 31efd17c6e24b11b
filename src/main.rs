use crate::db::connection::{init_db, Database};
use crate::monitor::{Monitor, SEARCH_URL};
use crate::notify::NtfyNotifier;
use crate::scraper::RenderApiClient;

mod db;
mod domain;
mod errors;
mod monitor;
mod notify;
mod scraper;

#[cfg(test)]
mod tests;

const DB_PATH: &str = "listings.sqlite3";

fn main() {
    // 1️⃣ Create the database handle
    let db = Database::new(DB_PATH);

    // 2️⃣ Apply the schema; safe on every startup
    if let Err(e) = init_db(&db) {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 3️⃣ Build the rendering client
    let renderer = match RenderApiClient::new() {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("❌ Render client initialization failed: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting listing monitor for {SEARCH_URL}");

    // 4️⃣ Hand everything to the loop; it never returns
    Monitor::new(db, renderer, NtfyNotifier::new()).run();
}
