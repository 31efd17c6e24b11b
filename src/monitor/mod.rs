// src/monitor/mod.rs

use std::thread;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;

use crate::db::connection::Database;
use crate::db::{cycles, listings};
use crate::notify::ListingNotifier;
use crate::scraper::{extract_listings, PageRenderer};

/// Search page the monitor polls.
pub const SEARCH_URL: &str = "https://charlotte.craigslist.org/search/sss#search=1~gallery~0~0";

/// Wall-clock spacing between cycle starts.
const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// How long a stored listing may live before it is purged.
const RETENTION_HORIZON_HOURS: i64 = 1;

/// Post-cycle pause: a fixed base plus a bounded random component seeded
/// by the candidate count, to spread out request timing.
pub(crate) const PAUSE_BASE_SECS: u64 = 2;
pub(crate) const PAUSE_MODULUS: u64 = 3;

/// Counters for one fetch → extract → insert/notify → expire pass.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub candidates: usize,
    pub new_listings: usize,
    pub notified: usize,
    pub expired: usize,
}

pub struct Monitor<R, N> {
    db: Database,
    renderer: R,
    notifier: N,
}

impl<R: PageRenderer, N: ListingNotifier> Monitor<R, N> {
    pub fn new(db: Database, renderer: R, notifier: N) -> Self {
        Self {
            db,
            renderer,
            notifier,
        }
    }

    /// Poll forever. Ticks fire on a fixed schedule regardless of how
    /// long a cycle takes; a tick that lands while the previous cycle or
    /// its pause is still running is dropped, so cycles never overlap.
    pub fn run(&self) -> ! {
        let mut next_tick = Instant::now() + CHECK_INTERVAL;
        loop {
            thread::sleep(next_tick.saturating_duration_since(Instant::now()));
            while next_tick <= Instant::now() {
                next_tick += CHECK_INTERVAL;
            }

            let stats = self.run_cycle();
            thread::sleep(cycle_pause(stats.candidates));
        }
    }

    /// One full pass. Never propagates: every failure inside the cycle
    /// is logged and contained so the loop outlives it.
    pub fn run_cycle(&self) -> CycleStats {
        let mut stats = CycleStats::default();

        let run_id = self
            .db
            .with_conn(|conn| cycles::start_cycle_run(conn, Utc::now().timestamp()))
            .unwrap_or_else(|e| {
                eprintln!("⚠️ Failed to record cycle start: {e}");
                0
            });

        eprintln!("📄 Checking {SEARCH_URL}");

        let html = match self.renderer.render(SEARCH_URL) {
            Ok(html) => html,
            Err(e) => {
                // Abandon the whole cycle: no extraction, no expiry.
                eprintln!("⚠️ Fetch failed: {e}");
                self.finish_cycle(run_id, &stats, false, Some(e.to_string()));
                return stats;
            }
        };

        let observed_at = Utc::now().naive_utc();
        let candidates = match extract_listings(&html, SEARCH_URL, observed_at) {
            Ok(candidates) => candidates,
            Err(e) => {
                eprintln!("⚠️ Extraction failed: {e}");
                Vec::new()
            }
        };
        stats.candidates = candidates.len();

        #[cfg(debug_assertions)]
        dump_candidates_debug(&candidates);

        for listing in &candidates {
            let created = match self
                .db
                .with_conn(|conn| listings::insert_listing(conn, listing))
            {
                Ok(created) => created,
                Err(e) => {
                    eprintln!("⚠️ Failed to insert {}: {e}", listing.listing_url);
                    continue;
                }
            };

            // Notify only when this very insert created the row; a
            // listing that was already stored never alerts again, no
            // matter its price.
            if !created {
                continue;
            }
            stats.new_listings += 1;

            if listing.has_notifiable_price() {
                match self.notifier.notify(listing) {
                    Ok(()) => {
                        stats.notified += 1;
                        if let Err(e) = self
                            .db
                            .with_conn(|conn| listings::mark_notified(conn, &listing.listing_url))
                        {
                            eprintln!("⚠️ Failed to mark {} notified: {e}", listing.listing_url);
                        }
                    }
                    Err(e) => eprintln!("⚠️ Notification failed: {e}"),
                }
            }
        }

        let cutoff = Utc::now().naive_utc() - ChronoDuration::hours(RETENTION_HORIZON_HOURS);
        match self
            .db
            .with_conn(|conn| listings::expire_older_than(conn, cutoff))
        {
            Ok(expired) => stats.expired = expired,
            Err(e) => eprintln!("⚠️ Failed to expire old listings: {e}"),
        }

        let total = self
            .db
            .with_conn(|conn| listings::count_listings(conn))
            .unwrap_or(-1);
        eprintln!(
            "✅ Cycle done: {} candidates, {} new, {} notified, {} expired, {} stored",
            stats.candidates, stats.new_listings, stats.notified, stats.expired, total
        );

        self.finish_cycle(run_id, &stats, true, None);
        stats
    }

    fn finish_cycle(&self, run_id: i64, stats: &CycleStats, success: bool, error: Option<String>) {
        let result = self.db.with_conn(|conn| {
            cycles::end_cycle_run(
                conn,
                run_id,
                Utc::now().timestamp(),
                stats.candidates,
                stats.new_listings,
                stats.notified,
                stats.expired,
                success,
                error,
            )
        });
        if let Err(e) = result {
            eprintln!("⚠️ Failed to record cycle end: {e}");
        }
    }
}

/// Randomized pause in `[PAUSE_BASE_SECS, PAUSE_BASE_SECS + PAUSE_MODULUS)`
/// seconds, seeded by how busy the page was this cycle.
pub(crate) fn cycle_pause(candidates: usize) -> Duration {
    let spread = candidates as u64 % PAUSE_MODULUS;
    let jitter = rand::thread_rng().gen_range(0..=spread);
    Duration::from_secs(PAUSE_BASE_SECS + jitter)
}

#[cfg(debug_assertions)]
fn dump_candidates_debug(candidates: &[crate::domain::Listing]) {
    if let Ok(json) = serde_json::to_string_pretty(candidates) {
        let _ = std::fs::write("candidates_debug.json", json);
    }
}
