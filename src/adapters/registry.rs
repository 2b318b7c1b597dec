//! Static provider registry.
//!
//! Providers are registered once at boot, in the order they should run.
//! The set is rebuilt on every wake since nothing survives deep sleep.

use log::info;

use crate::app::ports::{DataProvider, ProviderRegistry, RegistryError};

#[derive(Default)]
pub struct ProviderSet {
    providers: Vec<Box<dyn DataProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; registration order is run order.
    pub fn register(&mut self, provider: impl DataProvider + 'static) -> &mut Self {
        info!("Registry: '{}' registered", provider.id());
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.id())
    }
}

impl ProviderRegistry for ProviderSet {
    fn providers(&mut self) -> Result<&mut [Box<dyn DataProvider>], RegistryError> {
        Ok(self.providers.as_mut_slice())
    }
}
