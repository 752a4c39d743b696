//! Trait definition for pluggable entity providers.
//!
//! Each data source (GitHub, arXiv, web profiles) implements [`Provider`] to
//! expose one uniform contract: a stable name, the entity types it can
//! produce, and a fetch entry point that never fails.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{Entity, EntityType, FetchParams};

/// A pluggable entity source.
///
/// Implementors only write [`try_fetch`](Provider::try_fetch), which may fail
/// at any stage. Callers use [`fetch`](Provider::fetch), which absorbs every
/// failure into an empty result so one source's outage never reaches the
/// caller or sibling providers.
///
/// All implementations must be `Send + Sync` for concurrent provider queries.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique short name, also used as the entity id namespace.
    fn name(&self) -> &str;

    /// Entity types this provider can produce.
    fn capabilities(&self) -> &[EntityType];

    /// Whether this provider can produce `entity_type`.
    fn supports(&self, entity_type: EntityType) -> bool {
        self.capabilities().contains(&entity_type)
    }

    /// Query the upstream and normalize the results.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] for invalid params, transport failures,
    /// timeouts, non-success statuses or unparsable bodies.
    async fn try_fetch(&self, params: &FetchParams) -> Result<Vec<Entity>, ProviderError>;

    /// Query the upstream, degrading any failure to an empty result.
    async fn fetch(&self, params: &FetchParams) -> Vec<Entity> {
        match self.try_fetch(params).await {
            Ok(entities) => {
                tracing::debug!(
                    provider = self.name(),
                    count = entities.len(),
                    "provider returned entities"
                );
                entities
            }
            Err(err) => {
                tracing::warn!(provider = self.name(), error = %err, "provider fetch failed");
                Vec::new()
            }
        }
    }
}
