//! Mapping table builder
//!
//! Turns parsed mapping resources into device tables. Each property key is
//! classified up front into a closed [`EntryKind`] and then dispatched with a
//! single `match`:
//!
//! | key                           | kind                           |
//! |-------------------------------|--------------------------------|
//! | `button.<name>`               | button raw code                |
//! | `trigger.<name>`              | trigger axis raw code          |
//! | `dpad.<name>`                 | d-pad axis raw code            |
//! | `stick.<Stick>.<X/Y>`         | stick axis raw code            |
//! | `buttonlabel.<ButtonId>`      | button label text              |
//! | `triggerlabel.<TriggerId>`    | trigger label text             |
//! | `buttonlabelkey.<ButtonId>`   | button localization key        |
//! | `triggerlabelkey.<TriggerId>` | trigger localization key       |
//!
//! For control entries the semantic name is the key after its first dot and
//! the value is the raw code, so `button.A=0` maps raw button 0 to `A`.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{DeviceTables, LabelDefaults, MappingCatalog, MappingCategory};
use crate::device::{DeviceIdentity, PRODUCT_ID_KEY, VENDOR_ID_KEY};
use crate::error::MappingError;
use crate::ids::{ButtonId, TriggerId};
use crate::properties::Properties;

/// Label table selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    ButtonLabel,
    TriggerLabel,
    ButtonLabelKey,
    TriggerLabelKey,
}

impl LabelKind {
    pub fn prefix(self) -> &'static str {
        match self {
            LabelKind::ButtonLabel => "buttonlabel",
            LabelKind::TriggerLabel => "triggerlabel",
            LabelKind::ButtonLabelKey => "buttonlabelkey",
            LabelKind::TriggerLabelKey => "triggerlabelkey",
        }
    }
}

/// Classification of one mapping resource key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Control(MappingCategory),
    Label(LabelKind),
    /// `vendor.id` / `product.id`, consumed before dispatch
    Identity,
    Unrecognized,
}

/// A property key split into its kind and semantic name part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey<'a> {
    pub kind: EntryKind,
    pub name: &'a str,
}

impl<'a> PropertyKey<'a> {
    pub fn classify(key: &'a str) -> Self {
        if key == VENDOR_ID_KEY || key == PRODUCT_ID_KEY {
            return Self {
                kind: EntryKind::Identity,
                name: "",
            };
        }

        let Some((prefix, name)) = key.split_once('.') else {
            return Self {
                kind: EntryKind::Unrecognized,
                name: key,
            };
        };

        let kind = match prefix {
            "button" => EntryKind::Control(MappingCategory::Button),
            "trigger" => EntryKind::Control(MappingCategory::TriggerAxis),
            "dpad" => EntryKind::Control(MappingCategory::DpadAxis),
            "stick" => EntryKind::Control(MappingCategory::StickAxis),
            "buttonlabel" => EntryKind::Label(LabelKind::ButtonLabel),
            "triggerlabel" => EntryKind::Label(LabelKind::TriggerLabel),
            "buttonlabelkey" => EntryKind::Label(LabelKind::ButtonLabelKey),
            "triggerlabelkey" => EntryKind::Label(LabelKind::TriggerLabelKey),
            _ => EntryKind::Unrecognized,
        };

        Self { kind, name }
    }
}

/// Accumulates device tables; the catalog only becomes visible through
/// [`CatalogBuilder::build`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: MappingCatalog,
    seen: HashSet<DeviceIdentity>,
}

impl CatalogBuilder {
    pub fn new(defaults: LabelDefaults) -> Self {
        Self {
            catalog: MappingCatalog {
                defaults,
                ..MappingCatalog::default()
            },
            seen: HashSet::new(),
        }
    }

    /// Make sure every table of `device` exists
    pub fn ensure_device(&mut self, device: DeviceIdentity) -> &mut DeviceTables {
        self.catalog.devices.entry(device).or_default()
    }

    /// Insert `raw code -> semantic name` into the `(category, device)` table
    ///
    /// A raw code that is already mapped is overwritten.
    pub fn add_mapping(
        &mut self,
        category: MappingCategory,
        semantic_name: &str,
        raw_code: &str,
        device: DeviceIdentity,
    ) -> Result<(), MappingError> {
        let key = || format!("{}.{}", category.prefix(), semantic_name);

        if semantic_name.is_empty() {
            return Err(MappingError::EmptySemanticName { key: key() });
        }

        let code = raw_code
            .trim()
            .parse::<u32>()
            .map_err(|_| MappingError::InvalidRawCode {
                key: key(),
                value: raw_code.to_string(),
            })?;

        debug!(">> Add mapping for {} on {}: {}={}", category, device, semantic_name, code);

        let table = self.ensure_device(device).table_mut(category);
        if let Some(previous) = table.insert(code, semantic_name.to_string()) {
            if previous != semantic_name {
                debug!("{} code {} on {} remapped from {} to {}", category, code, device, previous, semantic_name);
            }
        }

        Ok(())
    }

    /// Insert a label text or localization key for a button or trigger
    pub fn add_label(
        &mut self,
        kind: LabelKind,
        semantic_name: &str,
        text: &str,
        device: DeviceIdentity,
    ) -> Result<(), MappingError> {
        let unknown = |source| MappingError::UnknownSemanticId {
            key: format!("{}.{}", kind.prefix(), semantic_name),
            source,
        };

        debug!(">> Add {} on {}: {}={}", kind.prefix(), device, semantic_name, text);

        match kind {
            LabelKind::ButtonLabel | LabelKind::ButtonLabelKey => {
                let id = ButtonId::from_name(semantic_name).map_err(unknown)?;
                let tables = self.ensure_device(device);
                let table = if kind == LabelKind::ButtonLabel {
                    &mut tables.button_labels
                } else {
                    &mut tables.button_label_keys
                };
                table.insert(id, text.to_string());
            },
            LabelKind::TriggerLabel | LabelKind::TriggerLabelKey => {
                let id = TriggerId::from_name(semantic_name).map_err(unknown)?;
                let tables = self.ensure_device(device);
                let table = if kind == LabelKind::TriggerLabel {
                    &mut tables.trigger_labels
                } else {
                    &mut tables.trigger_label_keys
                };
                table.insert(id, text.to_string());
            },
        }

        Ok(())
    }

    /// Add every entry of one parsed mapping resource
    pub fn add_mapping_file(&mut self, props: &Properties) -> Result<DeviceIdentity, MappingError> {
        let device = DeviceIdentity::from_hex(props.get(VENDOR_ID_KEY), props.get(PRODUCT_ID_KEY))?;

        if !self.seen.insert(device) {
            warn!("Device {} is configured by more than one mapping file, merging entries", device);
        }
        self.ensure_device(device);

        for (key, value) in props.iter() {
            let entry = PropertyKey::classify(key);
            match entry.kind {
                EntryKind::Control(category) => self.add_mapping(category, entry.name, value, device)?,
                EntryKind::Label(kind) => self.add_label(kind, entry.name, value, device)?,
                EntryKind::Identity => {},
                EntryKind::Unrecognized => warn!("Ignoring unrecognized mapping key '{}' for {}", key, device),
            }
        }

        let sticks = self.ensure_device(device).stick_axes.len();
        if sticks % 2 != 0 {
            return Err(MappingError::OddStickAxisCount { device, count: sticks });
        }

        Ok(device)
    }

    pub fn build(self) -> MappingCatalog {
        info!(
            "Built mapping catalog: {} devices, {} default labels",
            self.catalog.devices.len(),
            self.catalog.defaults.len()
        );
        self.catalog
    }
}
