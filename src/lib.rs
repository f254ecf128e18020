//! padmap - per-device gamepad mapping tables
//!
//! Resolves raw, vendor-specific button numbers and axis indices into
//! portable semantic controls (`A`, `LeftStick.X`, `RightTrigger`, ...) and
//! provides display labels for them, per controller model.
//!
//! ```no_run
//! use padmap::{ButtonId, DeviceIdentity, MappingCatalog, MappingCategory};
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = MappingCatalog::builtin()?;
//! let xbox = DeviceIdentity::new(0x045e, 0x028e);
//!
//! assert_eq!(catalog.resolve(xbox, MappingCategory::Button, 0), Some("A"));
//! let label = catalog
//!     .button_label(xbox, ButtonId::A)
//!     .or_else(|| catalog.default_button_label(ButtonId::A));
//! # let _ = label;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod ids;
pub mod loader;
pub mod paths;
pub mod properties;

pub use catalog::{DeviceView, LabelDefaults, MappingCatalog, MappingCategory, SharedCatalog};
pub use config::{CatalogWatcher, EngineConfig, SourcesConfig};
pub use device::{Controller, DeviceIdentity};
pub use error::{LookupError, MappingError, PropertiesError};
pub use ids::{ButtonId, StickAxis, StickId, StickSlot, TriggerId, UnknownSemanticId};
pub use loader::{DirectorySource, EmbeddedSource, ResourceSource};
