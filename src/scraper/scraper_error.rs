use std::error::Error;
use std::fmt;

/// Failures while obtaining a rendered snapshot of the search page.
/// Any of these abandons the current cycle; none of them stops the loop.
#[derive(Debug)]
pub enum FetchError {
    Config(String),
    Network(String),
    RenderFailed(String),
    Readiness(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Config(msg) => write!(f, "Config error: {msg}"),
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::RenderFailed(msg) => write!(f, "Render failed: {msg}"),
            FetchError::Readiness(msg) => write!(f, "Results never became ready: {msg}"),
        }
    }
}

impl Error for FetchError {}

/// Failures while mapping a snapshot to candidate listings.
#[derive(Debug)]
pub enum ExtractError {
    Selector(String),
    MetaShape(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Selector(msg) => write!(f, "Selector parse error: {msg}"),
            ExtractError::MetaShape(text) => {
                write!(f, "Metadata missing expected parts: {text:?}")
            }
        }
    }
}

impl Error for ExtractError {}
