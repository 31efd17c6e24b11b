pub mod extract;
mod fetcher;
mod scraper_error;

pub use extract::extract_listings;
pub use fetcher::{PageRenderer, RenderApiClient};
pub use scraper_error::{ExtractError, FetchError};
