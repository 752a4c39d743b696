//! Web profile search. Scrapes the DuckDuckGo HTML endpoint for public
//! profile pages matching the query.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`, which
//! requires no JavaScript and is tolerant of automated requests.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::{endpoint, SearchConfig};
use crate::error::ProviderError;
use crate::http;
use crate::normalize::web::{normalize, WebHit, SOURCE};
use crate::provider::Provider;
use crate::types::{Entity, EntityType, FetchParams};

/// Results requested when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Results page ceiling honoured by this provider.
pub const MAX_LIMIT: usize = 30;

/// Appended to the caller's query to bias results towards people.
const PROFILE_HINT: &str = "profile";

const CAPABILITIES: &[EntityType] = &[EntityType::People];

/// DuckDuckGo HTML profile scraper.
pub struct WebProvider {
    base_url: String,
    timeout_seconds: u64,
}

impl WebProvider {
    /// Build the provider from config.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            base_url: config.web.base_url.clone(),
            timeout_seconds: config.request_timeout_seconds,
        }
    }

    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

#[async_trait]
impl Provider for WebProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    fn capabilities(&self) -> &[EntityType] {
        CAPABILITIES
    }

    async fn try_fetch(&self, params: &FetchParams) -> Result<Vec<Entity>, ProviderError> {
        let query = params.checked_query()?;
        let limit = params.effective_limit(DEFAULT_LIMIT, MAX_LIMIT);
        tracing::trace!(query, limit, "web profile search");

        // A fresh client per fetch rotates the User-Agent and drops cookies.
        let client = http::build_scraper_client(self.timeout_seconds)?;
        let q = format!("{query} {PROFILE_HINT}");
        let request = client
            .post(endpoint(&self.base_url, "html/"))
            .form(&[("q", q.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9");
        let html = http::send_for_text(request, "web search").await?;

        tracing::trace!(bytes = html.len(), "web search response received");

        let hits = parse_results_html(&html, limit)?;
        Ok(hits.iter().map(normalize).collect())
    }
}

/// Parse a DuckDuckGo HTML results page into organic hits.
///
/// Ads are skipped, redirect links unwrapped, and hits without a title or
/// link dropped.
pub(crate) fn parse_results_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<WebHit>, ProviderError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| ProviderError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| ProviderError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| ProviderError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut hits = Vec::new();

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let href = title_el.value().attr("href");
        let Some(url) = href.and_then(WebProvider::extract_url) else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(WebHit {
            title,
            url,
            snippet,
            rank: hits.len() + 1,
        });

        if hits.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = hits.len(), "web results parsed");
    Ok(hits)
}
