mod ntfy;

pub use ntfy::NtfyNotifier;
pub(crate) use ntfy::alert_message;

use crate::domain::Listing;
use std::fmt;

/// Errors from the push transport. Delivery is best-effort: the loop
/// logs these and moves on without retrying or touching store state.
#[derive(Debug)]
pub enum NotifyError {
    Transport(String),
    Rejected(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(msg) => write!(f, "Request failed: {msg}"),
            NotifyError::Rejected(msg) => write!(f, "Push endpoint error: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Seam over the push transport so cycle logic can observe dispatches
/// in tests without touching the network.
pub trait ListingNotifier {
    fn notify(&self, listing: &Listing) -> Result<(), NotifyError>;
}
