//! # scout-search
//!
//! Provider aggregation and normalization engine for scout.
//!
//! Heterogeneous public sources (GitHub users, arXiv authors, web profile
//! pages) are queried under one [`Provider`] contract and their records
//! normalized into a single [`Entity`] schema.
//!
//! ## Design
//!
//! - Every provider declares a name and the entity types it can produce
//! - [`Provider::fetch`] never fails: upstream errors become an empty result
//! - GitHub hits are enriched with profile details for a bounded prefix,
//!   concurrently, keeping the original order
//! - Free-text locations are geocoded through Nominatim and cached, and a
//!   great-circle distance is attached when the caller gives a reference point
//! - [`Aggregator`] fans a query out to all selected providers concurrently
//!   and returns results grouped per provider or flattened
//!
//! ## Security
//!
//! - API tokens are optional and never logged
//! - Queries are logged only at trace level
//! - No network listeners: this is a library, not a server

pub mod aggregator;
pub mod config;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod http;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod types;

pub use aggregator::{Aggregator, ProviderResults, ProviderSelection};
pub use config::SearchConfig;
pub use enrich::{DetailEnricher, Enriched};
pub use error::{ProviderError, Result};
pub use geo::{distance_km, GeoResolver};
pub use provider::Provider;
pub use registry::ProviderRegistry;
pub use types::{AttrValue, Coordinates, Entity, EntityType, FetchParams, GeoPoint};

/// Query every provider enabled in `config` and return all entities of
/// `entity_type` (any type when `None`), flattened in provider order.
///
/// # Errors
///
/// Returns [`ProviderError::Config`] if `config` is invalid. Individual
/// provider failures are logged and contribute no entities.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scout_search::Result<()> {
/// use scout_search::{EntityType, FetchParams, SearchConfig};
///
/// let params = FetchParams::new("rust async").with_limit(5);
/// let config = SearchConfig::default();
/// let people = scout_search::search(&params, Some(EntityType::People), &config).await?;
/// for entity in &people {
///     println!("{} [{}]: {}", entity.name, entity.source, entity.headline);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    params: &FetchParams,
    entity_type: Option<EntityType>,
    config: &SearchConfig,
) -> Result<Vec<Entity>> {
    let aggregator = Aggregator::from_config(config)?;
    Ok(aggregator
        .fetch_entities(&ProviderSelection::All, params, entity_type)
        .await)
}
