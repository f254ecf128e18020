//! Mapping resource loader
//!
//! Reads the default-label resource and the master list of per-device mapping
//! files, then feeds every mapping file through the [`CatalogBuilder`]. Any
//! failure aborts the whole load: callers either get a complete catalog or an
//! error whose chain names the resource and the cause.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogBuilder, EntryKind, LabelDefaults, LabelKind, MappingCatalog, PropertyKey};
use crate::config::SourcesConfig;
use crate::error::MappingError;
use crate::ids::{ButtonId, TriggerId};
use crate::properties::Properties;

/// Default location of the default-label resource
pub const DEFAULT_LABELS_RESOURCE: &str = "/mappings/default-labels.properties";

/// Default location of the master mapping-file list
pub const MAPPING_FILES_RESOURCE: &str = "/mappings/mapping-files.properties";

/// Somewhere resources can be read from by reference
pub trait ResourceSource: Send + Sync {
    /// Read the whole resource into a string
    fn read(&self, reference: &str) -> Result<String>;

    /// Human readable description for logs
    fn describe(&self) -> String;
}

/// Resources stored below a root directory
///
/// A leading `/` in a reference is relative to the root, so
/// `/mappings/xbox360.properties` resolves to `<root>/mappings/xbox360.properties`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference.trim().trim_start_matches('/'))
    }
}

impl ResourceSource for DirectorySource {
    fn read(&self, reference: &str) -> Result<String> {
        let path = self.resolve(reference);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read resource '{}' ({})", reference, path.display()))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Resources compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    resources: &'static [(&'static str, &'static str)],
}

/// Bundled mapping resources
const BUILTIN_RESOURCES: &[(&str, &str)] = &[
    (
        "mappings/default-labels.properties",
        include_str!("../resources/mappings/default-labels.properties"),
    ),
    (
        "mappings/mapping-files.properties",
        include_str!("../resources/mappings/mapping-files.properties"),
    ),
    (
        "mappings/xbox360.properties",
        include_str!("../resources/mappings/xbox360.properties"),
    ),
    (
        "mappings/dualshock4.properties",
        include_str!("../resources/mappings/dualshock4.properties"),
    ),
    (
        "mappings/ouya.properties",
        include_str!("../resources/mappings/ouya.properties"),
    ),
];

impl EmbeddedSource {
    pub const fn new(resources: &'static [(&'static str, &'static str)]) -> Self {
        Self { resources }
    }

    /// The resources shipped with the crate
    pub const fn builtin() -> Self {
        Self::new(BUILTIN_RESOURCES)
    }
}

impl ResourceSource for EmbeddedSource {
    fn read(&self, reference: &str) -> Result<String> {
        let wanted = reference.trim().trim_start_matches('/');
        self.resources
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, content)| content.to_string())
            .with_context(|| format!("Resource not found: {}", reference))
    }

    fn describe(&self) -> String {
        format!("{} embedded resources", self.resources.len())
    }
}

/// Read and parse one properties resource
pub fn load_properties(source: &dyn ResourceSource, reference: &str) -> Result<Properties> {
    let text = source.read(reference)?;
    Properties::parse(&text).with_context(|| format!("Failed to parse resource: {}", reference))
}

/// Load the cross-device default labels
pub fn load_default_labels(source: &dyn ResourceSource, reference: &str) -> Result<LabelDefaults> {
    let props = load_properties(source, reference)?;
    let mut defaults = LabelDefaults::default();

    for (key, value) in props.iter() {
        let entry = PropertyKey::classify(key);
        let unknown = |source| MappingError::UnknownSemanticId {
            key: key.to_string(),
            source,
        };

        match entry.kind {
            EntryKind::Label(LabelKind::ButtonLabel) => {
                let id = ButtonId::from_name(entry.name).map_err(unknown)?;
                defaults.buttons.insert(id, value.to_string());
            },
            EntryKind::Label(LabelKind::TriggerLabel) => {
                let id = TriggerId::from_name(entry.name).map_err(unknown)?;
                defaults.triggers.insert(id, value.to_string());
            },
            _ => warn!("Ignoring unexpected key '{}' in default labels {}", key, reference),
        }
    }

    debug!("Loaded {} default labels from {}", defaults.len(), reference);
    Ok(defaults)
}

/// Load the master list; every value references one mapping resource
pub fn load_mapping_file_list(source: &dyn ResourceSource, reference: &str) -> Result<Vec<String>> {
    let props = load_properties(source, reference)?;

    props
        .iter()
        .map(|(key, value)| {
            let value = value.trim();
            if value.is_empty() {
                anyhow::bail!("Empty mapping file reference for '{}' in {}", key, reference);
            }
            Ok(value.to_string())
        })
        .collect()
}

/// Build a complete catalog from a resource source
pub fn load_catalog(
    source: &dyn ResourceSource,
    default_labels: &str,
    mapping_files: &str,
) -> Result<MappingCatalog> {
    build_catalog(source, default_labels, mapping_files)
        .with_context(|| format!("Failed to process mappings from {}", source.describe()))
}

fn build_catalog(source: &dyn ResourceSource, default_labels: &str, mapping_files: &str) -> Result<MappingCatalog> {
    let defaults = load_default_labels(source, default_labels)?;
    let files = load_mapping_file_list(source, mapping_files)?;

    let mut builder = CatalogBuilder::new(defaults);
    for file in &files {
        info!("> processing mapping file: {}", file);
        let props = load_properties(source, file)?;
        let device = builder
            .add_mapping_file(&props)
            .with_context(|| format!("Invalid mapping file: {}", file))?;
        debug!("{} configures device {}", file, device);
    }

    Ok(builder.build())
}

/// Built-in catalog, parsed once
static BUILTIN_CATALOG: OnceLock<MappingCatalog> = OnceLock::new();

impl MappingCatalog {
    /// Load the catalog described by a sources configuration
    ///
    /// Without a root directory the embedded resources are used.
    pub fn load(sources: &SourcesConfig) -> Result<Self> {
        match &sources.root {
            Some(root) => load_catalog(&DirectorySource::new(root), &sources.default_labels, &sources.mapping_files),
            None => load_catalog(&EmbeddedSource::builtin(), &sources.default_labels, &sources.mapping_files),
        }
    }

    /// Catalog of the resources shipped with the crate (cached after first parse)
    pub fn builtin() -> Result<&'static MappingCatalog> {
        if let Some(catalog) = BUILTIN_CATALOG.get() {
            return Ok(catalog);
        }

        let catalog = load_catalog(&EmbeddedSource::builtin(), DEFAULT_LABELS_RESOURCE, MAPPING_FILES_RESOURCE)?;
        // Another thread may have won the race; either value is identical
        Ok(BUILTIN_CATALOG.get_or_init(|| catalog))
    }
}
