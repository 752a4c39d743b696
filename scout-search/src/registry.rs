//! Name → provider registry.

use std::sync::Arc;

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::geo::{DisabledResolver, GeoResolver, NominatimResolver};
use crate::provider::Provider;
use crate::providers::{ArxivProvider, GithubProvider, WebProvider};

/// An ordered set of providers with unique names.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every built-in provider enabled in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] if the config is invalid, or
    /// [`ProviderError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ProviderError> {
        config.validate()?;

        let geocoder: Arc<dyn GeoResolver> = if config.geocoder.enabled {
            Arc::new(NominatimResolver::new(&config.geocoder, &config.user_agent)?)
        } else {
            Arc::new(DisabledResolver)
        };

        let mut registry = Self::new();
        if config.github.enabled {
            registry.register(Arc::new(GithubProvider::new(config, geocoder)?))?;
        }
        if config.arxiv.enabled {
            registry.register(Arc::new(ArxivProvider::new(config)?))?;
        }
        if config.web.enabled {
            registry.register(Arc::new(WebProvider::new(config)))?;
        }

        tracing::debug!(providers = ?registry.names(), "provider registry built");
        Ok(registry)
    }

    /// Add a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DuplicateProvider`] if the name is taken.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> Result<(), ProviderError> {
        if self.get(provider.name()).is_some() {
            return Err(ProviderError::DuplicateProvider(provider.name().to_owned()));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Iterate providers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.iter()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
