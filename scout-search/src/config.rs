//! Provider and aggregation configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which built-in providers are registered, where
//! they point, timeouts, the enrichment bound and the aggregator fan-out
//! width. Every section deserializes with defaults for missing fields so a
//! partial TOML file is enough.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Descriptive client identifier sent to API upstreams and the geocoder.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "scout/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/scout-rs/scout)"
);

/// Top-level configuration for the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-request timeout for searches and detail lookups, in seconds.
    pub request_timeout_seconds: u64,
    /// How many leading search hits receive a secondary detail lookup.
    pub enrichment_limit: usize,
    /// Maximum number of providers queried at once. `None` runs all selected
    /// providers concurrently.
    pub max_concurrent_providers: Option<usize>,
    /// Client identifier for API providers and the geocoder.
    pub user_agent: String,
    /// GitHub user search.
    pub github: GithubConfig,
    /// arXiv paper search.
    pub arxiv: ArxivConfig,
    /// Web profile search (HTML scraping).
    pub web: WebConfig,
    /// Free-text geocoding.
    pub geocoder: GeocoderConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 10,
            enrichment_limit: 10,
            max_concurrent_providers: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            github: GithubConfig::default(),
            arxiv: ArxivConfig::default(),
            web: WebConfig::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

/// GitHub provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Register the provider.
    pub enabled: bool,
    /// REST API root.
    pub base_url: String,
    /// Optional personal access token; raises the upstream rate limit.
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.github.com".to_owned(),
            token: None,
        }
    }
}

/// arXiv provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    /// Register the provider.
    pub enabled: bool,
    /// Export API root.
    pub base_url: String,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://export.arxiv.org".to_owned(),
        }
    }
}

/// Web profile search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Register the provider.
    pub enabled: bool,
    /// HTML search endpoint root.
    pub base_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://html.duckduckgo.com".to_owned(),
        }
    }
}

/// Geocoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Resolve locations at all. When disabled every lookup is a miss.
    pub enabled: bool,
    /// Nominatim-compatible API root.
    pub base_url: String,
    /// Lookup timeout in seconds.
    pub timeout_seconds: u64,
    /// Contact address passed to the service per its usage policy.
    pub email: Option<String>,
    /// How long resolved locations are cached. Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://nominatim.openstreetmap.org".to_owned(),
            timeout_seconds: 5,
            email: None,
            cache_ttl_seconds: 3600,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `request_timeout_seconds` and `geocoder.timeout_seconds` must be greater than 0
    /// - `max_concurrent_providers`, when set, must be greater than 0
    /// - `user_agent` must not be blank
    /// - enabled sections must have a base URL
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.request_timeout_seconds == 0 {
            return Err(ProviderError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.geocoder.timeout_seconds == 0 {
            return Err(ProviderError::Config(
                "geocoder.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_providers == Some(0) {
            return Err(ProviderError::Config(
                "max_concurrent_providers must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ProviderError::Config("user_agent must not be empty".into()));
        }
        let sections = [
            ("github", self.github.enabled, &self.github.base_url),
            ("arxiv", self.arxiv.enabled, &self.arxiv.base_url),
            ("web", self.web.enabled, &self.web.base_url),
            ("geocoder", self.geocoder.enabled, &self.geocoder.base_url),
        ];
        for (name, enabled, base_url) in sections {
            if enabled && url::Url::parse(base_url).is_err() {
                return Err(ProviderError::Config(format!(
                    "{name}.base_url is not a valid URL: {base_url:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Join a configured base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
