// extract.rs
use crate::domain::Listing;
use crate::scraper::ExtractError;
use chrono::NaiveDateTime;
use scraper::{Html, Selector};
use url::Url;

const RESULT_SELECTOR: &str = "li.cl-search-result";
const LINK_SELECTOR: &str = "a";
const PRICE_SELECTOR: &str = ".priceinfo";
const META_SELECTOR: &str = ".meta";

/// Separator the page uses inside the combined metadata text.
const META_SEPARATOR: char = '·';

const TITLE_FALLBACK: &str = "No title";

/// Map a rendered snapshot to candidate listings.
///
/// Pure with respect to its inputs: the same snapshot, page URL and
/// observation time always produce the same ordered sequence.
/// Individually malformed elements are expected page noise and are
/// skipped; only a broken selector is a hard error.
pub fn extract_listings(
    html: &str,
    page_url: &str,
    observed_at: NaiveDateTime,
) -> Result<Vec<Listing>, ExtractError> {
    let document = Html::parse_document(html);
    let result_sel = parse_selector(RESULT_SELECTOR)?;
    let link_sel = parse_selector(LINK_SELECTOR)?;
    let price_sel = parse_selector(PRICE_SELECTOR)?;
    let meta_sel = parse_selector(META_SELECTOR)?;

    let base = Url::parse(page_url).ok();

    let mut listings = Vec::new();

    for element in document.select(&result_sel) {
        let title = element
            .value()
            .attr("title")
            .unwrap_or(TITLE_FALLBACK)
            .to_string();

        // The detail link is the identity of a listing. No link, no record.
        let href = match element
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => href,
            None => continue,
        };

        let listing_url = match resolve_link(base.as_ref(), href) {
            Some(resolved) => resolved,
            None => continue,
        };

        let price = element
            .select(&price_sel)
            .next()
            .map(|p| p.text().collect::<String>())
            .unwrap_or_default()
            .trim()
            .to_string();

        let meta_text = element
            .select(&meta_sel)
            .next()
            .map(|m| m.text().collect::<String>())
            .unwrap_or_default();

        let city = match parse_meta(meta_text.trim()) {
            Ok(city) => city,
            Err(e) => {
                eprintln!("⚠️ Skipping listing element: {e}");
                continue;
            }
        };

        listings.push(Listing {
            title,
            price,
            city,
            posted: observed_at,
            listing_url,
        });
    }

    Ok(listings)
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector(e.to_string()))
}

/// Hrefs on the page are normally absolute, but resolve against the
/// page URL so relative ones survive too.
fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    base?.join(href).ok().map(|resolved| resolved.to_string())
}

/// The combined metadata text reads `<relative-time> · <city> [· ...]`.
/// Anything that does not match that positional shape is reported as a
/// malformed element rather than guessed at.
pub(crate) fn parse_meta(text: &str) -> Result<String, ExtractError> {
    let mut parts = text.split(META_SEPARATOR);

    let relative_time = parts.next().map(str::trim).unwrap_or("");
    let city = parts.next().map(str::trim).unwrap_or("");

    if relative_time.is_empty() || city.is_empty() {
        return Err(ExtractError::MetaShape(text.to_string()));
    }

    Ok(city.to_string())
}
