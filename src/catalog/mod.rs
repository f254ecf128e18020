//! Per-device mapping catalog
//!
//! A [`MappingCatalog`] owns every table the engine knows about: for each
//! device identity the four control tables (buttons, trigger axes, d-pad axes,
//! stick axes) and the label tables, plus the global default labels.
//!
//! Catalogs are assembled by [`CatalogBuilder`] and are immutable once built.
//! Queries live in [`lookup`]; [`SharedCatalog`] publishes whole replacement
//! catalogs for hot reload.

pub mod builder;
pub mod lookup;
pub mod shared;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::device::DeviceIdentity;
use crate::ids::{ButtonId, TriggerId};

pub use builder::{CatalogBuilder, EntryKind, LabelKind, PropertyKey};
pub use lookup::DeviceView;
pub use shared::SharedCatalog;

/// Raw code to semantic name table for one device and category
pub type ControlTable = HashMap<u32, String>;

/// Which table a raw code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingCategory {
    Button,
    TriggerAxis,
    DpadAxis,
    StickAxis,
}

impl MappingCategory {
    pub const ALL: [MappingCategory; 4] = [
        MappingCategory::Button,
        MappingCategory::TriggerAxis,
        MappingCategory::DpadAxis,
        MappingCategory::StickAxis,
    ];

    /// Property key prefix used in mapping resources
    pub fn prefix(self) -> &'static str {
        match self {
            MappingCategory::Button => "button",
            MappingCategory::TriggerAxis => "trigger",
            MappingCategory::DpadAxis => "dpad",
            MappingCategory::StickAxis => "stick",
        }
    }
}

impl fmt::Display for MappingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for MappingCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.prefix() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown mapping category '{}' (expected button, trigger, dpad or stick)", s))
    }
}

/// All tables for one controller model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceTables {
    pub buttons: ControlTable,
    pub trigger_axes: ControlTable,
    pub dpad_axes: ControlTable,
    pub stick_axes: ControlTable,

    pub button_labels: HashMap<ButtonId, String>,
    pub button_label_keys: HashMap<ButtonId, String>,
    pub trigger_labels: HashMap<TriggerId, String>,
    pub trigger_label_keys: HashMap<TriggerId, String>,
}

impl DeviceTables {
    pub fn table(&self, category: MappingCategory) -> &ControlTable {
        match category {
            MappingCategory::Button => &self.buttons,
            MappingCategory::TriggerAxis => &self.trigger_axes,
            MappingCategory::DpadAxis => &self.dpad_axes,
            MappingCategory::StickAxis => &self.stick_axes,
        }
    }

    pub fn table_mut(&mut self, category: MappingCategory) -> &mut ControlTable {
        match category {
            MappingCategory::Button => &mut self.buttons,
            MappingCategory::TriggerAxis => &mut self.trigger_axes,
            MappingCategory::DpadAxis => &mut self.dpad_axes,
            MappingCategory::StickAxis => &mut self.stick_axes,
        }
    }
}

/// Cross-device fallback label text, keyed by semantic ID only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDefaults {
    pub buttons: HashMap<ButtonId, String>,
    pub triggers: HashMap<TriggerId, String>,
}

impl LabelDefaults {
    pub fn button(&self, id: ButtonId) -> Option<&str> {
        self.buttons.get(&id).map(String::as_str)
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&str> {
        self.triggers.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buttons.len() + self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.triggers.is_empty()
    }
}

/// Immutable set of all mapping and label tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingCatalog {
    pub(crate) devices: HashMap<DeviceIdentity, DeviceTables>,
    pub(crate) defaults: LabelDefaults,
}

impl MappingCatalog {
    /// Catalog with no devices and no default labels
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tables of one device, if it was configured
    pub fn tables(&self, device: DeviceIdentity) -> Option<&DeviceTables> {
        self.devices.get(&device)
    }

    pub fn defaults(&self) -> &LabelDefaults {
        &self.defaults
    }

    /// Configured device identities, sorted
    pub fn devices(&self) -> Vec<DeviceIdentity> {
        let mut ids: Vec<_> = self.devices.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of configured devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_prefix_round_trip() {
        for category in MappingCategory::ALL {
            assert_eq!(category.prefix().parse::<MappingCategory>().unwrap(), category);
        }
        assert!("axis".parse::<MappingCategory>().is_err());
    }

    #[test]
    fn test_table_selection() {
        let mut tables = DeviceTables::default();
        tables.table_mut(MappingCategory::DpadAxis).insert(6, "Horizontal".to_string());

        assert_eq!(tables.dpad_axes.get(&6).map(String::as_str), Some("Horizontal"));
        assert!(tables.table(MappingCategory::Button).is_empty());
        assert_eq!(tables.table(MappingCategory::DpadAxis).len(), 1);
    }

    #[test]
    fn test_devices_sorted() {
        let mut catalog = MappingCatalog::empty();
        catalog.devices.insert(DeviceIdentity::new(0x054c, 0x05c4), DeviceTables::default());
        catalog.devices.insert(DeviceIdentity::new(0x045e, 0x028e), DeviceTables::default());

        assert_eq!(
            catalog.devices(),
            vec![DeviceIdentity::new(0x045e, 0x028e), DeviceIdentity::new(0x054c, 0x05c4)]
        );
        assert_eq!(catalog.len(), 2);
    }
}
