// src/notify/ntfy.rs

use crate::domain::Listing;
use crate::notify::{ListingNotifier, NotifyError};
use reqwest::blocking::Client;

/// Fixed push topic alerts are published to.
const NTFY_TOPIC_URL: &str = "https://ntfy.sh/charlottecraig";

const ALERT_TITLE: &str = "Craigslist Alert";

pub struct NtfyNotifier {
    client: Client,
    topic_url: String,
}

impl NtfyNotifier {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            topic_url: NTFY_TOPIC_URL.to_string(),
        }
    }
}

impl ListingNotifier for NtfyNotifier {
    fn notify(&self, listing: &Listing) -> Result<(), NotifyError> {
        let message = alert_message(listing);

        let response = self
            .client
            .post(&self.topic_url)
            .header("Title", ALERT_TITLE)
            .header("Priority", "high")
            .header(
                "Actions",
                format!("view, View listing, {}", listing.listing_url),
            )
            .body(message.clone())
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(NotifyError::Rejected(format!("{status} - {text}")));
        }

        println!("Notification sent: {message}");
        Ok(())
    }
}

/// Short human-readable alert body: title, price (or "unknown"), city.
pub(crate) fn alert_message(listing: &Listing) -> String {
    let price = if listing.price.is_empty() {
        "unknown"
    } else {
        listing.price.as_str()
    };
    format!(
        "New free or unknown price listing! {} ({}) {}",
        listing.title, price, listing.city
    )
}
