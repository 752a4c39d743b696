//! arXiv export API: researchers via the papers they authored.

use async_trait::async_trait;

use crate::config::{endpoint, SearchConfig};
use crate::error::ProviderError;
use crate::http;
use crate::normalize::arxiv::{normalize, parse_feed, SOURCE};
use crate::provider::Provider;
use crate::types::{Entity, EntityType, FetchParams};

/// Results requested when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Upstream result ceiling honoured by this provider.
pub const MAX_LIMIT: usize = 50;

const CAPABILITIES: &[EntityType] = &[EntityType::People];

/// arXiv Atom API provider.
pub struct ArxivProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivProvider {
    /// Build the provider from config.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_api_client(&config.user_agent, config.request_timeout_seconds)?,
            base_url: config.arxiv.base_url.clone(),
        })
    }
}

#[async_trait]
impl Provider for ArxivProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    fn capabilities(&self) -> &[EntityType] {
        CAPABILITIES
    }

    async fn try_fetch(&self, params: &FetchParams) -> Result<Vec<Entity>, ProviderError> {
        let query = params.checked_query()?;
        let limit = params.effective_limit(DEFAULT_LIMIT, MAX_LIMIT);
        tracing::trace!(query, limit, "arxiv search");

        let search_query = format!("all:{query}");
        let max_results = limit.to_string();
        let request = self
            .client
            .get(endpoint(&self.base_url, "api/query"))
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ]);
        let body = http::send_for_text(request, "arxiv query").await?;

        let entries = parse_feed(&body)?;
        Ok(entries.iter().take(limit).map(normalize).collect())
    }
}
