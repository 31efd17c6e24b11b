// src/tests/monitor_tests.rs
use crate::db::listings::{count_listings, insert_listing};
use crate::domain::Listing;
use crate::errors::StoreError;
use crate::monitor::{cycle_pause, Monitor, PAUSE_BASE_SECS, PAUSE_MODULUS};
use crate::notify::{ListingNotifier, NotifyError};
use crate::scraper::{FetchError, PageRenderer};
use crate::tests::utils::{init_test_db, listing};
use chrono::{Duration, Utc};
use std::cell::RefCell;
use std::rc::Rc;

const A_URL: &str = "https://charlotte.craigslist.org/fuo/d/free-couch/1001.html";
const B_URL: &str = "https://charlotte.craigslist.org/fuo/d/desk-chair/1002.html";

const FIXTURE: &str = r#"
<html><body><ol>
<li class="cl-search-result" title="Free couch">
  <a href="https://charlotte.craigslist.org/fuo/d/free-couch/1001.html">Free couch</a>
  <span class="priceinfo">Free</span>
  <div class="meta">5m ago · Charlotte</div>
</li>
<li class="cl-search-result" title="Desk chair">
  <a href="https://charlotte.craigslist.org/fuo/d/desk-chair/1002.html">Desk chair</a>
  <span class="priceinfo">$50</span>
  <div class="meta">20m ago · Matthews</div>
</li>
</ol></body></html>
"#;

const EMPTY_FIXTURE: &str = "<html><body><ol></ol></body></html>";

struct FixtureRenderer(&'static str);

impl PageRenderer for FixtureRenderer {
    fn render(&self, _url: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render(&self, _url: &str) -> Result<String, FetchError> {
        Err(FetchError::Network("connection refused".into()))
    }
}

/// Collects dispatched alerts instead of POSTing them.
#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Rc<RefCell<Vec<String>>>,
}

impl ListingNotifier for RecordingNotifier {
    fn notify(&self, listing: &Listing) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(listing.listing_url.clone());
        Ok(())
    }
}

struct BrokenNotifier;

impl ListingNotifier for BrokenNotifier {
    fn notify(&self, _listing: &Listing) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected("429 Too Many Requests - (no body)".into()))
    }
}

fn notified_urls(db: &crate::db::connection::Database) -> Vec<String> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT listing_url FROM listings WHERE notified = 1 ORDER BY id")
            .map_err(|e| StoreError::Db(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Db(e.to_string()))?;

        let mut urls = Vec::new();
        for row in rows {
            urls.push(row.map_err(|e| StoreError::Db(e.to_string()))?);
        }
        Ok(urls)
    })
    .expect("query notified listings")
}

#[test]
fn notifies_only_new_qualifying_listings() -> Result<(), Box<dyn std::error::Error>> {
    let db = init_test_db();
    let now = Utc::now().naive_utc();

    // B is already known to the store before the cycle runs.
    db.with_conn(|conn| insert_listing(conn, &listing(B_URL, "$50", now)))?;

    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let monitor = Monitor::new(db.clone(), FixtureRenderer(FIXTURE), notifier);

    let stats = monitor.run_cycle();

    assert_eq!(stats.candidates, 2);
    assert_eq!(stats.new_listings, 1);
    assert_eq!(stats.notified, 1);

    // Exactly one alert, for A; both rows stored afterwards.
    assert_eq!(*sent.borrow(), vec![A_URL.to_string()]);
    assert_eq!(db.with_conn(|conn| count_listings(conn))?, 2);
    assert_eq!(notified_urls(&db), vec![A_URL.to_string()]);

    Ok(())
}

#[test]
fn repeat_sightings_never_renotify() -> Result<(), Box<dyn std::error::Error>> {
    let db = init_test_db();

    let notifier = RecordingNotifier::default();
    let sent = notifier.sent.clone();
    let monitor = Monitor::new(db.clone(), FixtureRenderer(FIXTURE), notifier);

    let first = monitor.run_cycle();
    assert_eq!(first.new_listings, 2);
    assert_eq!(first.notified, 1);

    // A still has a qualifying price on the second sighting, but its
    // insert no longer reports created.
    let second = monitor.run_cycle();
    assert_eq!(second.candidates, 2);
    assert_eq!(second.new_listings, 0);
    assert_eq!(second.notified, 0);
    assert_eq!(sent.borrow().len(), 1);

    Ok(())
}

#[test]
fn fetch_failure_abandons_cycle_without_expiry() -> Result<(), Box<dyn std::error::Error>> {
    let db = init_test_db();
    let now = Utc::now().naive_utc();

    // Stale enough that a completed cycle would purge it.
    db.with_conn(|conn| {
        insert_listing(conn, &listing("https://x.org/stale", "$5", now - Duration::hours(2)))
    })?;

    let monitor = Monitor::new(db.clone(), FailingRenderer, RecordingNotifier::default());
    let stats = monitor.run_cycle();

    assert_eq!(stats.candidates, 0);
    assert_eq!(stats.new_listings, 0);
    assert_eq!(stats.notified, 0);
    assert_eq!(stats.expired, 0);

    // The abandoned cycle skipped expiry entirely.
    assert_eq!(db.with_conn(|conn| count_listings(conn))?, 1);

    // The failed run is still recorded.
    let (success, error): (i64, Option<String>) = db.with_conn(|conn| {
        conn.query_row(
            "SELECT success, error_message FROM cycle_runs ORDER BY id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| StoreError::Db(e.to_string()))
    })?;
    assert_eq!(success, 0);
    assert!(error.unwrap_or_default().contains("connection refused"));

    Ok(())
}

#[test]
fn completed_cycle_expires_stale_rows() -> Result<(), Box<dyn std::error::Error>> {
    let db = init_test_db();
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        insert_listing(conn, &listing("https://x.org/stale", "$5", now - Duration::hours(2)))
    })?;

    let monitor = Monitor::new(
        db.clone(),
        FixtureRenderer(EMPTY_FIXTURE),
        RecordingNotifier::default(),
    );
    let stats = monitor.run_cycle();

    assert_eq!(stats.candidates, 0);
    assert_eq!(stats.expired, 1);
    assert_eq!(db.with_conn(|conn| count_listings(conn))?, 0);

    Ok(())
}

#[test]
fn failed_notification_does_not_abort_or_mark() -> Result<(), Box<dyn std::error::Error>> {
    let db = init_test_db();

    let monitor = Monitor::new(db.clone(), FixtureRenderer(FIXTURE), BrokenNotifier);
    let stats = monitor.run_cycle();

    // Both inserts landed even though the alert for A failed.
    assert_eq!(stats.new_listings, 2);
    assert_eq!(stats.notified, 0);
    assert_eq!(db.with_conn(|conn| count_listings(conn))?, 2);
    assert!(notified_urls(&db).is_empty());

    Ok(())
}

#[test]
fn cycle_pause_stays_within_bounds() {
    let min = std::time::Duration::from_secs(PAUSE_BASE_SECS);
    let max = std::time::Duration::from_secs(PAUSE_BASE_SECS + PAUSE_MODULUS);

    for candidates in 0..10 {
        for _ in 0..25 {
            let pause = cycle_pause(candidates);
            assert!(pause >= min, "{pause:?} below base for {candidates} candidates");
            assert!(pause < max, "{pause:?} at or above cap for {candidates} candidates");
        }
    }
}
