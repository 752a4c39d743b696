//! Concurrent multi-provider fan-out.
//!
//! Selects providers by name and capability, queries them concurrently with
//! shared [`FetchParams`], and returns results grouped per provider or
//! flattened. Providers absorb their own failures, so a failing provider
//! simply contributes no entities. No deduplication or ranking happens here.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::provider::Provider;
use crate::registry::ProviderRegistry;
use crate::types::{Entity, EntityType, FetchParams};

/// Which providers a caller wants to query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProviderSelection {
    /// Every registered provider.
    #[default]
    All,
    /// Only the named providers, in the given order. Unknown names are skipped
    /// and repeated names are queried once.
    Named(Vec<String>),
}

impl ProviderSelection {
    /// Select a single provider by name.
    pub fn one(name: impl Into<String>) -> Self {
        Self::Named(vec![name.into()])
    }
}

/// The entities one provider returned.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResults {
    /// Provider name.
    pub provider: String,
    /// Normalized entities; empty if the provider failed.
    pub entities: Vec<Entity>,
}

/// Fans a query out to the providers of a registry.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: ProviderRegistry,
    max_concurrency: Option<usize>,
}

impl Aggregator {
    /// Aggregate over `registry`, querying all selected providers at once.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            max_concurrency: None,
        }
    }

    /// Aggregate over the built-in providers enabled in `config`.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderRegistry::from_config`].
    pub fn from_config(config: &SearchConfig) -> Result<Self, ProviderError> {
        Ok(Self::new(ProviderRegistry::from_config(config)?)
            .with_max_concurrency(config.max_concurrent_providers))
    }

    /// Limit how many providers are queried at the same time.
    /// `None` or `Some(0)` means unbounded.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency.filter(|&n| n > 0);
        self
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve `selection` to providers able to produce `entity_type`
    /// (any type when `None`).
    pub fn select(
        &self,
        selection: &ProviderSelection,
        entity_type: Option<EntityType>,
    ) -> Vec<Arc<dyn Provider>> {
        let candidates: Vec<Arc<dyn Provider>> = match selection {
            ProviderSelection::All => self.registry.iter().cloned().collect(),
            ProviderSelection::Named(names) => {
                let mut seen = HashSet::new();
                names
                    .iter()
                    .filter(|name| seen.insert(name.as_str()))
                    .filter_map(|name| {
                        let provider = self.registry.get(name);
                        if provider.is_none() {
                            tracing::warn!(
                                provider = %name,
                                "unknown provider requested, skipping"
                            );
                        }
                        provider
                    })
                    .collect()
            }
        };

        candidates
            .into_iter()
            .filter(|p| entity_type.map_or(true, |t| p.supports(t)))
            .collect()
    }

    /// Query the selected providers concurrently and group results per provider.
    ///
    /// Output order follows selection order regardless of completion order.
    pub async fn fetch_grouped(
        &self,
        selection: &ProviderSelection,
        params: &FetchParams,
        entity_type: Option<EntityType>,
    ) -> Vec<ProviderResults> {
        let providers = self.select(selection, entity_type);
        tracing::debug!(count = providers.len(), "querying providers");

        let queries = providers.into_iter().map(|provider| async move {
            let entities = provider.fetch(params).await;
            ProviderResults {
                provider: provider.name().to_owned(),
                entities,
            }
        });

        match self.max_concurrency {
            Some(width) => {
                futures::stream::iter(queries)
                    .buffered(width)
                    .collect()
                    .await
            }
            None => futures::future::join_all(queries).await,
        }
    }

    /// Query the selected providers concurrently and concatenate their entities.
    pub async fn fetch_entities(
        &self,
        selection: &ProviderSelection,
        params: &FetchParams,
        entity_type: Option<EntityType>,
    ) -> Vec<Entity> {
        self.fetch_grouped(selection, params, entity_type)
            .await
            .into_iter()
            .flat_map(|group| group.entities)
            .collect()
    }
}
