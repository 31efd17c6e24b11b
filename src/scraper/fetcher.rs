// fetcher.rs
use crate::scraper::FetchError;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const RENDER_API_URL: &str = "https://api.zenrows.com/v1/";

/// The search results are populated asynchronously, so the remote
/// browser must wait for the list items themselves; a plain page-load
/// event fires before any of them exist.
const READY_SELECTOR: &str = "li.cl-search-result";

/// Narrow seam over the browser-rendering collaborator so cycle logic
/// can run against canned HTML or simulated failures in tests.
pub trait PageRenderer {
    fn render(&self, url: &str) -> Result<String, FetchError>;
}

/// Renders pages through a remote headless-browser API. Each call gets
/// its own remote browser session, scoped to the request; the response
/// and connection are dropped on every exit path.
pub struct RenderApiClient {
    client: Client,
}

impl RenderApiClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageRenderer for RenderApiClient {
    fn render(&self, url: &str) -> Result<String, FetchError> {
        let api_key = std::env::var("RENDER_API_KEY").map_err(|_| {
            FetchError::Config("RENDER_API_KEY environment variable not set".into())
        })?;

        let mut params = HashMap::new();
        params.insert("url", url.to_string());
        params.insert("apikey", api_key);
        params.insert("js_render", "true".to_string());
        params.insert("wait_for", READY_SELECTOR.to_string());

        let resp = self
            .client
            .get(RENDER_API_URL)
            .query(&params)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::RenderFailed(format!("HTTP {status}: {text}")));
        }

        // The API reports render failures as a JSON body with a code field.
        if text.starts_with('{') {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                if json.get("code").is_some() {
                    return Err(FetchError::RenderFailed(text));
                }
            }
        }

        // The remote browser was told to wait for the results list; a
        // snapshot without it means the wait gave up before the page
        // finished populating.
        if !text.contains("cl-search-result") {
            return Err(FetchError::Readiness(format!(
                "no {READY_SELECTOR} in rendered snapshot"
            )));
        }

        #[cfg(debug_assertions)]
        {
            let _ = std::fs::write("listing_debug.html", &text);
        }

        Ok(text)
    }
}
