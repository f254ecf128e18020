//! Shared, atomically replaceable catalog handle
//!
//! Readers take an `Arc` snapshot and query it without holding any lock.
//! A reload builds a complete catalog first and only then swaps it in under
//! the write lock, so readers see either the old or the new table set, never
//! a mix.

use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use super::MappingCatalog;

#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Arc<MappingCatalog>>>,
}

impl SharedCatalog {
    pub fn new(catalog: MappingCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Current catalog
    pub fn snapshot(&self) -> Arc<MappingCatalog> {
        self.inner.read().clone()
    }

    /// Publish a fully built catalog, returning the previous one
    pub fn replace(&self, catalog: MappingCatalog) -> Arc<MappingCatalog> {
        let next = Arc::new(catalog);
        std::mem::replace(&mut *self.inner.write(), next)
    }

    /// Build a new catalog with `load` and publish it on success
    ///
    /// On failure the current catalog stays in place and the error is
    /// returned.
    pub fn reload_with<F>(&self, load: F) -> Result<Arc<MappingCatalog>>
    where
        F: FnOnce() -> Result<MappingCatalog>,
    {
        match load() {
            Ok(catalog) => {
                let devices = catalog.len();
                self.replace(catalog);
                info!("Mapping catalog reloaded ({} devices)", devices);
                Ok(self.snapshot())
            },
            Err(e) => {
                warn!("Failed to reload mapping catalog (keeping previous tables): {:#}", e);
                Err(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, MappingCategory};
    use crate::device::DeviceIdentity;

    const PAD: DeviceIdentity = DeviceIdentity::new(0x1234, 0x5678);

    fn catalog_with_button(name: &str) -> MappingCatalog {
        let mut builder = CatalogBuilder::default();
        builder.add_mapping(MappingCategory::Button, name, "0", PAD).unwrap();
        builder.build()
    }

    #[test]
    fn test_replace_publishes_whole_catalog() {
        let shared = SharedCatalog::new(catalog_with_button("A"));
        let before = shared.snapshot();

        let previous = shared.replace(catalog_with_button("B"));
        assert_eq!(previous.resolve(PAD, MappingCategory::Button, 0), Some("A"));

        // Old snapshots stay valid and unchanged
        assert_eq!(before.resolve(PAD, MappingCategory::Button, 0), Some("A"));
        assert_eq!(shared.snapshot().resolve(PAD, MappingCategory::Button, 0), Some("B"));
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let shared = SharedCatalog::new(catalog_with_button("A"));

        let result = shared.reload_with(|| Err(anyhow::anyhow!("vendor.id missing")));
        assert!(result.is_err());
        assert_eq!(shared.snapshot().resolve(PAD, MappingCategory::Button, 0), Some("A"));

        let reloaded = shared.reload_with(|| Ok(catalog_with_button("Y"))).unwrap();
        assert_eq!(reloaded.resolve(PAD, MappingCategory::Button, 0), Some("Y"));
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedCatalog::new(MappingCatalog::empty());
        let reader = shared.clone();

        shared.replace(catalog_with_button("A"));
        assert_eq!(reader.snapshot().len(), 1);
    }
}
