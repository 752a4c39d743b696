//! GitHub user search: developers by keyword, enriched with profile
//! details, geocoded location and distance from the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{endpoint, GithubConfig, SearchConfig};
use crate::enrich::DetailEnricher;
use crate::error::ProviderError;
use crate::geo::GeoResolver;
use crate::http;
use crate::normalize::github::{
    normalize, GithubContext, GithubSearchResponse, GithubUserDetail, GithubUserItem, SOURCE,
};
use crate::provider::Provider;
use crate::types::{Entity, EntityType, FetchParams, GeoPoint};

/// Results requested when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Upstream page-size ceiling honoured by this provider.
pub const MAX_LIMIT: usize = 30;

const CAPABILITIES: &[EntityType] = &[EntityType::People];

/// Detail lookup outcome for one user: the profile and its resolved location.
#[derive(Debug, Clone)]
struct UserEnrichment {
    detail: GithubUserDetail,
    geo: Option<GeoPoint>,
}

/// GitHub REST API provider.
pub struct GithubProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    enricher: DetailEnricher,
    geocoder: Arc<dyn GeoResolver>,
}

impl GithubProvider {
    /// Build the provider from config, sharing `geocoder` for location lookups.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        config: &SearchConfig,
        geocoder: Arc<dyn GeoResolver>,
    ) -> Result<Self, ProviderError> {
        let GithubConfig { base_url, token, .. } = &config.github;
        Ok(Self {
            client: http::build_api_client(&config.user_agent, config.request_timeout_seconds)?,
            base_url: base_url.clone(),
            token: token.clone().filter(|t| !t.trim().is_empty()),
            enricher: DetailEnricher::new(config.enrichment_limit),
            geocoder,
        })
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Run the shallow user search.
    async fn search_users(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GithubUserItem>, ProviderError> {
        let per_page = limit.to_string();
        let request = self
            .get(endpoint(&self.base_url, "search/users"))
            .query(&[("q", query), ("per_page", per_page.as_str())]);
        let body = http::send_for_text(request, "github search").await?;

        let response: GithubSearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("github search response: {e}")))?;
        let mut users = response.users();
        users.truncate(limit);
        Ok(users)
    }

    /// Fetch one user's profile.
    async fn user_detail(&self, login: &str) -> Result<GithubUserDetail, ProviderError> {
        let request = self.get(endpoint(&self.base_url, &format!("users/{login}")));
        let body = http::send_for_text(request, "github user detail").await?;
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("github user detail: {e}")))
    }

    /// Detail lookup followed by geocoding of the profile location.
    async fn enrich_user(&self, login: Option<String>) -> Result<UserEnrichment, ProviderError> {
        let login = login.ok_or_else(|| ProviderError::Parse("search hit has no login".into()))?;
        let detail = self.user_detail(&login).await?;
        let geo = match detail.location.as_deref() {
            Some(text) => self.geocoder.resolve(text).await,
            None => None,
        };
        Ok(UserEnrichment { detail, geo })
    }
}

#[async_trait]
impl Provider for GithubProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    fn capabilities(&self) -> &[EntityType] {
        CAPABILITIES
    }

    async fn try_fetch(&self, params: &FetchParams) -> Result<Vec<Entity>, ProviderError> {
        let query = params.checked_query()?;
        let limit = params.effective_limit(DEFAULT_LIMIT, MAX_LIMIT);
        tracing::trace!(query, limit, "github search");

        let users = self.search_users(query, limit).await?;
        let enriched = self
            .enricher
            .enrich(users, |user| self.enrich_user(user.login.clone()))
            .await;

        Ok(enriched
            .iter()
            .map(|item| {
                let enrichment = item.detail();
                let ctx = GithubContext {
                    detail: enrichment.map(|e| &e.detail),
                    geo: enrichment.and_then(|e| e.geo.as_ref()),
                    reference: params.location,
                };
                normalize(item.shallow(), &ctx)
            })
            .collect())
    }
}
