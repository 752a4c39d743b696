//! Shared HTTP client construction.
//!
//! API upstreams (GitHub, arXiv, Nominatim) get a client carrying the
//! descriptive scout User-Agent. The HTML scraper gets a browser-like client
//! with a rotating User-Agent and a cookie store.

use crate::error::ProviderError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per scraper client.
const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for a JSON/XML API upstream.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed.
pub fn build_api_client(
    user_agent: &str,
    timeout_seconds: u64,
) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| ProviderError::Http(format!("failed to build HTTP client: {e}")))
}

/// Build a [`reqwest::Client`] configured for HTML scraping.
///
/// The client has a cookie store, the given timeout, a random browser
/// User-Agent and brotli/gzip decompression.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed.
pub fn build_scraper_client(timeout_seconds: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(random_browser_user_agent())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ProviderError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random browser User-Agent string from the rotation list.
pub fn random_browser_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    BROWSER_USER_AGENTS
        .choose(&mut rng)
        .copied()
        // BROWSER_USER_AGENTS is a non-empty const array
        .unwrap_or(BROWSER_USER_AGENTS[0])
}

/// Send a request and return the body of a successful response.
///
/// Transport errors, timeouts and non-success statuses are all mapped to
/// [`ProviderError`] with `context` naming the call.
pub async fn send_for_text(
    request: reqwest::RequestBuilder,
    context: &str,
) -> Result<String, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(context, e))?
        .error_for_status()
        .map_err(|e| ProviderError::from_reqwest(context, e))?;

    response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(context, e))
}
