//! Mapping resource watcher for hot-reload support

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::EngineConfig;
use crate::catalog::{MappingCatalog, SharedCatalog};

/// Watches the resource directory, rebuilds the catalog on change and
/// publishes it into a [`SharedCatalog`]
pub struct CatalogWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Arc<MappingCatalog>>,
}

impl CatalogWatcher {
    /// Start watching `config.sources.root`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &EngineConfig, shared: SharedCatalog) -> Result<Self> {
        let root = config
            .sources
            .root
            .clone()
            .context("Hot reload needs a resource directory (sources.root)")?;

        let (tx, rx) = mpsc::channel(10);
        let sources = config.sources.clone();
        let debounce = Duration::from_millis(config.watch.debounce_ms);

        // notify callbacks run on their own OS thread, not in Tokio context
        let runtime_handle = tokio::runtime::Handle::current();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)) {
                        return;
                    }
                    debug!("Mapping resources changed: {:?}", event.paths);

                    let sources = sources.clone();
                    let shared = shared.clone();
                    let tx = tx.clone();

                    runtime_handle.spawn(async move {
                        // Debounce: wait a bit for file writes to complete
                        tokio::time::sleep(debounce).await;

                        let loaded = tokio::task::spawn_blocking(move || MappingCatalog::load(&sources)).await;
                        let loaded = match loaded {
                            Ok(result) => result,
                            Err(e) => {
                                error!("Mapping reload task failed: {}", e);
                                return;
                            },
                        };

                        // A failed reload is logged by the handle and keeps the old tables
                        if let Ok(catalog) = shared.reload_with(|| loaded) {
                            if let Err(e) = tx.send(catalog).await {
                                debug!("No listener for catalog updates: {}", e);
                            }
                        }
                    });
                },
                Err(e) => {
                    error!("Watch error: {}", e);
                },
            }
        })?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch resource directory: {}", root.display()))?;

        info!("Mapping resource watcher started for: {}", root.display());

        Ok(Self { _watcher: watcher, rx })
    }

    /// Wait for the next successfully reloaded catalog
    /// Returns None if the watcher has been closed
    pub async fn next_catalog(&mut self) -> Option<Arc<MappingCatalog>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MappingCategory;
    use crate::device::DeviceIdentity;
    use std::fs;
    use tempfile::TempDir;

    fn write_pad(dir: &TempDir, button: &str) -> Result<()> {
        fs::write(
            dir.path().join("mappings/pad.properties"),
            format!("vendor.id=1234\nproduct.id=5678\nbutton.{}=0\n", button),
        )?;
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_watcher_basic() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("mappings"))?;
        fs::write(temp_dir.path().join("mappings/default-labels.properties"), "buttonlabel.A=A\n")?;
        fs::write(
            temp_dir.path().join("mappings/mapping-files.properties"),
            "pad=/mappings/pad.properties\n",
        )?;
        write_pad(&temp_dir, "A")?;

        let mut config = EngineConfig::default();
        config.sources.root = Some(temp_dir.path().to_path_buf());
        config.watch.enabled = true;

        let shared = SharedCatalog::new(MappingCatalog::load(&config.sources)?);
        let pad = DeviceIdentity::new(0x1234, 0x5678);
        assert_eq!(shared.snapshot().resolve(pad, MappingCategory::Button, 0), Some("A"));

        let mut watcher = CatalogWatcher::new(&config, shared.clone())?;

        tokio::time::sleep(Duration::from_millis(100)).await;
        write_pad(&temp_dir, "B")?;

        // Filesystem notification delivery varies by platform; only check
        // the result when a reload arrived in time
        if let Ok(Some(catalog)) = tokio::time::timeout(Duration::from_secs(2), watcher.next_catalog()).await {
            assert_eq!(catalog.resolve(pad, MappingCategory::Button, 0), Some("B"));
            assert_eq!(shared.snapshot().resolve(pad, MappingCategory::Button, 0), Some("B"));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_watcher_requires_directory() {
        let config = EngineConfig::default();
        let shared = SharedCatalog::new(MappingCatalog::empty());
        assert!(CatalogWatcher::new(&config, shared).is_err());
    }
}
