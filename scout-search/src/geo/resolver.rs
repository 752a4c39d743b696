//! Free-text location resolution.
//!
//! Geocoding is best-effort enrichment: a [`GeoResolver`] never fails, it
//! answers `None` for blank input (without any network call), for misses and
//! for every kind of upstream failure.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;

use crate::config::{endpoint, GeocoderConfig};
use crate::error::ProviderError;
use crate::http;
use crate::types::GeoPoint;

/// Maximum number of cached locations.
const MAX_CACHE_ENTRIES: u64 = 1_000;

/// Resolves free-text locations to coordinates.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Resolve `text` to its first matching point, or `None`.
    async fn resolve(&self, text: &str) -> Option<GeoPoint>;
}

/// A resolver that never resolves anything. Used when geocoding is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledResolver;

#[async_trait]
impl GeoResolver for DisabledResolver {
    async fn resolve(&self, _text: &str) -> Option<GeoPoint> {
        None
    }
}

/// One place in a Nominatim `format=json` answer. Coordinates arrive as
/// strings from Nominatim proper and as numbers from some compatible servers.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    lat: Option<serde_json::Value>,
    #[serde(default)]
    lon: Option<serde_json::Value>,
    #[serde(default)]
    display_name: Option<String>,
}

fn coordinate(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// [Nominatim](https://nominatim.org) geocoder with an optional TTL cache.
///
/// Requests carry the configured descriptive User-Agent and, when set, a
/// contact email, as required by the public instance's usage policy.
pub struct NominatimResolver {
    client: reqwest::Client,
    base_url: String,
    email: Option<String>,
    cache: Option<Cache<String, GeoPoint>>,
}

impl NominatimResolver {
    /// Build a resolver from config.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &GeocoderConfig, user_agent: &str) -> Result<Self, ProviderError> {
        let client = http::build_api_client(user_agent, config.timeout_seconds)?;
        let cache = (config.cache_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
                .build()
        });
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            email: config.email.clone(),
            cache,
        })
    }

    /// Query the geocoder once. `Ok(None)` means the service found no match.
    pub async fn lookup(&self, text: &str) -> Result<Option<GeoPoint>, ProviderError> {
        let mut query = vec![("q", text), ("format", "json"), ("limit", "1")];
        if let Some(email) = self.email.as_deref() {
            query.push(("email", email));
        }

        let request = self
            .client
            .get(endpoint(&self.base_url, "search"))
            .query(&query)
            .header("Accept", "application/json");
        let body = http::send_for_text(request, "geocode").await?;

        let places: Vec<NominatimPlace> = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("geocode response: {e}")))?;

        Ok(places.into_iter().next().and_then(|place| {
            let lat = coordinate(place.lat.as_ref())?;
            let lon = coordinate(place.lon.as_ref())?;
            let label = place
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| text.to_owned());
            GeoPoint::new(lat, lon, label)
        }))
    }
}

#[async_trait]
impl GeoResolver for NominatimResolver {
    async fn resolve(&self, text: &str) -> Option<GeoPoint> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let key = text.to_lowercase();
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::trace!(location = text, "geocode cache hit");
                return Some(hit);
            }
        }

        match self.lookup(text).await {
            Ok(Some(point)) => {
                if let Some(cache) = &self.cache {
                    cache.insert(key, point.clone()).await;
                }
                Some(point)
            }
            Ok(None) => {
                tracing::debug!(location = text, "geocode found no match");
                None
            }
            Err(err) => {
                tracing::warn!(location = text, error = %err, "geocode failed");
                None
            }
        }
    }
}
