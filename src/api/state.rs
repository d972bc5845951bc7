//! Application state for the Tax Engine API.
//!
//! The active [`RateTableRegistry`] is published behind an `RwLock<Arc<_>>`.
//! Handlers take a snapshot (a cloned `Arc`) and drop the lock before
//! calculating, so a reload never blocks or changes an in-flight calculation.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::{ConfigLoader, RateTableRegistry};
use crate::error::EngineResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    registry: RwLock<Arc<RateTableRegistry>>,
    rates_dir: PathBuf,
}

impl AppState {
    /// Creates the state from a loaded configuration directory.
    pub fn new(loader: ConfigLoader) -> Self {
        let rates_dir = loader.source().to_path_buf();
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(Arc::new(loader.into_registry())),
                rates_dir,
            }),
        }
    }

    /// Returns the directory reloads read from.
    pub fn rates_dir(&self) -> &std::path::Path {
        &self.inner.rates_dir
    }

    /// Returns a snapshot of the active registry.
    pub fn registry(&self) -> Arc<RateTableRegistry> {
        let guard = self
            .inner
            .registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replaces the active registry.
    pub fn publish(&self, registry: RateTableRegistry) -> Arc<RateTableRegistry> {
        let registry = Arc::new(registry);
        let mut guard = self
            .inner
            .registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&registry);
        registry
    }

    /// Reloads the rates directory and publishes the result.
    ///
    /// On error the active registry is left untouched.
    pub fn reload(&self) -> EngineResult<Arc<RateTableRegistry>> {
        let loader = ConfigLoader::load(&self.inner.rates_dir)?;
        let registry = self.publish(loader.into_registry());
        info!(
            rates_dir = %self.inner.rates_dir.display(),
            tables = registry.len(),
            "Rate tables reloaded"
        );
        Ok(registry)
    }
}
