// src/domain/listing.rs

use chrono::NaiveDateTime;
use serde::Serialize;

/// A listing seen on the search page during one cycle.
///
/// Candidates are ephemeral; the store decides whether one is new. The
/// detail URL is the only stable identity a listing has; everything
/// else on the page is presentation text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub title: String,
    /// Raw price text as shown on the page. May be empty.
    pub price: String,
    pub city: String,
    /// When we observed the listing; the page only shows relative times.
    pub posted: NaiveDateTime,
    pub listing_url: String,
}

impl Listing {
    /// Free, unpriced, or the site's "()" placeholder: the listings
    /// worth an alert.
    pub fn has_notifiable_price(&self) -> bool {
        self.price.is_empty() || self.price.eq_ignore_ascii_case("free") || self.price == "()"
    }
}
