//! Core types: the normalized [`Entity`] record, entity categories,
//! coordinates and fetch parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Entity categories a provider can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Individual people (researchers, developers, professionals).
    People,
    /// Organisations and companies.
    Orgs,
    /// Papers and publications.
    Papers,
    /// Generic web pages.
    Pages,
}

impl EntityType {
    /// Returns the wire tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Orgs => "orgs",
            Self::Papers => "papers",
            Self::Pages => "pages",
        }
    }

    /// Returns all categories.
    pub fn all() -> &'static [EntityType] {
        &[Self::People, Self::Orgs, Self::Papers, Self::Pages]
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity type: {s}"))
    }
}

/// A scalar attribute value. Serializes to a plain JSON scalar or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer count or identifier.
    Int(i64),
    /// Floating point measurement.
    Float(f64),
    /// Free text.
    Text(String),
}

impl AttrValue {
    /// Returns `true` for [`AttrValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a numeric payload as `f64`, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Null
        }
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The unified output record produced by every provider.
///
/// Every field is always serialized; nullable fields appear as `null` so
/// consumers can rely on a stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// `"<source>:<source-native-id>"`.
    pub id: String,
    /// Category, constant for a given provider.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub headline: String,
    /// Longer description, truncated per source.
    pub summary: String,
    /// Human-readable location.
    pub location: Option<String>,
    /// Canonical external link.
    pub url: Option<String>,
    /// Image / avatar link.
    pub image: Option<String>,
    /// Short name of the originating provider.
    pub source: String,
    /// Provider-local placeholder; not comparable across providers.
    pub score: f64,
    /// Provider-defined tags, in order.
    pub tags: Vec<String>,
    /// Provider-specific metadata. Keys are not shared across providers.
    pub attributes: BTreeMap<String, AttrValue>,
    /// Named links (avatar, profile, pdf, ...).
    pub media: BTreeMap<String, String>,
    /// Numeric ranking signals.
    pub metrics: BTreeMap<String, f64>,
    /// When this record was normalized.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Create an empty entity for `source`.
    ///
    /// The id is `"<source>:<native_id>"`. When the source gives no usable
    /// id a random one is generated, so repeated fetches of the same
    /// underlying record produce different ids.
    pub fn new(source: &str, entity_type: EntityType, native_id: Option<&str>) -> Self {
        let native = native_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_owned);

        Self {
            id: format!("{source}:{native}"),
            entity_type,
            name: String::new(),
            headline: String::new(),
            summary: String::new(),
            location: None,
            url: None,
            image: None,
            source: source.to_owned(),
            score: 0.0,
            tags: Vec::new(),
            attributes: BTreeMap::new(),
            media: BTreeMap::new(),
            metrics: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Set an attribute; `None` values are stored as `null`.
    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(key.to_owned(), value.into());
    }

    /// Set a metric.
    pub fn set_metric(&mut self, key: &str, value: f64) {
        self.metrics.insert(key.to_owned(), value);
    }

    /// Add a media link when one is present.
    pub fn set_media(&mut self, key: &str, link: Option<&str>) {
        if let Some(link) = link.map(str::trim).filter(|l| !l.is_empty()) {
            self.media.insert(key.to_owned(), link.to_owned());
        }
    }

    /// Look up an attribute.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }
}

/// A caller-supplied reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` when both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// Parse `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
        let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
        let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
        let coords = Self::new(lat, lon);
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(format!("coordinates out of range: {s}"))
        }
    }
}

/// A resolved location. Only produced by a [`GeoResolver`](crate::geo::GeoResolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in `[-90, 90]`.
    pub lat: f64,
    /// Longitude in `[-180, 180]`.
    pub lon: f64,
    /// Display label returned by the geocoder.
    pub label: String,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, lon: f64, label: impl Into<String>) -> Option<Self> {
        Coordinates::new(lat, lon).is_valid().then(|| Self {
            lat,
            lon,
            label: label.into(),
        })
    }

    /// The bare coordinates of this point.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Parameters shared by every provider for one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Free-text query. Must not be blank.
    pub query: String,
    /// Requested result count; each provider applies its own default and ceiling.
    pub limit: Option<usize>,
    /// Reference point for location-aware providers.
    pub location: Option<Coordinates>,
}

impl FetchParams {
    /// Parameters for `query` with provider defaults.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
            location: None,
        }
    }

    /// Request a specific number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attach a reference point for distance computation.
    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    /// The trimmed query, or an error if it is blank.
    pub fn checked_query(&self) -> crate::Result<&str> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(crate::ProviderError::InvalidParams(
                "query must not be empty".into(),
            ));
        }
        Ok(query)
    }

    /// Resolve the result count for a provider.
    ///
    /// Uses the requested limit (or `default`) and clamps it into
    /// `1..=ceiling`. A small request is never raised to the ceiling.
    pub fn effective_limit(&self, default: usize, ceiling: usize) -> usize {
        let ceiling = ceiling.max(1);
        self.limit.unwrap_or(default).clamp(1, ceiling)
    }
}
