//! Read-only queries over a built catalog
//!
//! Unknown devices and unmapped raw codes come back as `None` so polling code
//! can simply ignore inputs it has no mapping for. The control counts are the
//! exception: asking for the trigger or stick count of a device the catalog
//! has never seen is an error, because "zero triggers" and "no idea" mean
//! different things to a caller laying out a controller.
//!
//! Device-specific label queries never fall back to the global defaults on
//! their own; use the `default_*` queries (or the `*_or_default` helpers on
//! [`DeviceView`]) for that.

use super::{MappingCatalog, MappingCategory};
use crate::device::{Controller, DeviceIdentity};
use crate::error::LookupError;
use crate::ids::{ButtonId, TriggerId};

impl MappingCatalog {
    /// Semantic name mapped to `raw_code` for the device and category
    pub fn resolve(&self, device: DeviceIdentity, category: MappingCategory, raw_code: u32) -> Option<&str> {
        self.devices
            .get(&device)?
            .table(category)
            .get(&raw_code)
            .map(String::as_str)
    }

    /// Number of trigger axes mapped for the device
    pub fn trigger_count(&self, device: DeviceIdentity) -> Result<usize, LookupError> {
        self.devices
            .get(&device)
            .map(|tables| tables.trigger_axes.len())
            .ok_or(LookupError::UnknownDevice(device))
    }

    /// Number of sticks mapped for the device (two axes per stick)
    ///
    /// Returns 0 when no device in the catalog maps any stick axis.
    pub fn stick_count(&self, device: DeviceIdentity) -> Result<usize, LookupError> {
        if self.devices.values().all(|tables| tables.stick_axes.is_empty()) {
            return Ok(0);
        }
        self.devices
            .get(&device)
            .map(|tables| tables.stick_axes.len() / 2)
            .ok_or(LookupError::UnknownDevice(device))
    }

    pub fn button_label(&self, device: DeviceIdentity, id: ButtonId) -> Option<&str> {
        self.devices.get(&device)?.button_labels.get(&id).map(String::as_str)
    }

    pub fn button_label_key(&self, device: DeviceIdentity, id: ButtonId) -> Option<&str> {
        self.devices.get(&device)?.button_label_keys.get(&id).map(String::as_str)
    }

    pub fn trigger_label(&self, device: DeviceIdentity, id: TriggerId) -> Option<&str> {
        self.devices.get(&device)?.trigger_labels.get(&id).map(String::as_str)
    }

    pub fn trigger_label_key(&self, device: DeviceIdentity, id: TriggerId) -> Option<&str> {
        self.devices.get(&device)?.trigger_label_keys.get(&id).map(String::as_str)
    }

    /// Cross-device default label text for a button
    pub fn default_button_label(&self, id: ButtonId) -> Option<&str> {
        self.defaults.button(id)
    }

    /// Cross-device default label text for a trigger
    pub fn default_trigger_label(&self, id: TriggerId) -> Option<&str> {
        self.defaults.trigger(id)
    }

    /// Queries bound to one device
    pub fn device(&self, device: DeviceIdentity) -> DeviceView<'_> {
        DeviceView { catalog: self, device }
    }

    /// Queries bound to a connected controller's model
    pub fn controller(&self, controller: &impl Controller) -> DeviceView<'_> {
        self.device(controller.device_identity())
    }
}

/// Borrowed view of the catalog for a single device identity
#[derive(Debug, Clone, Copy)]
pub struct DeviceView<'a> {
    catalog: &'a MappingCatalog,
    device: DeviceIdentity,
}

impl<'a> DeviceView<'a> {
    pub fn identity(&self) -> DeviceIdentity {
        self.device
    }

    /// Whether the catalog has tables for this device
    pub fn is_known(&self) -> bool {
        self.catalog.devices.contains_key(&self.device)
    }

    pub fn resolve(&self, category: MappingCategory, raw_code: u32) -> Option<&'a str> {
        self.catalog.resolve(self.device, category, raw_code)
    }

    pub fn button(&self, raw_code: u32) -> Option<&'a str> {
        self.resolve(MappingCategory::Button, raw_code)
    }

    pub fn trigger_axis(&self, raw_code: u32) -> Option<&'a str> {
        self.resolve(MappingCategory::TriggerAxis, raw_code)
    }

    pub fn dpad_axis(&self, raw_code: u32) -> Option<&'a str> {
        self.resolve(MappingCategory::DpadAxis, raw_code)
    }

    pub fn stick_axis(&self, raw_code: u32) -> Option<&'a str> {
        self.resolve(MappingCategory::StickAxis, raw_code)
    }

    pub fn trigger_count(&self) -> Result<usize, LookupError> {
        self.catalog.trigger_count(self.device)
    }

    pub fn stick_count(&self) -> Result<usize, LookupError> {
        self.catalog.stick_count(self.device)
    }

    pub fn button_label(&self, id: ButtonId) -> Option<&'a str> {
        self.catalog.button_label(self.device, id)
    }

    pub fn button_label_key(&self, id: ButtonId) -> Option<&'a str> {
        self.catalog.button_label_key(self.device, id)
    }

    pub fn trigger_label(&self, id: TriggerId) -> Option<&'a str> {
        self.catalog.trigger_label(self.device, id)
    }

    pub fn trigger_label_key(&self, id: TriggerId) -> Option<&'a str> {
        self.catalog.trigger_label_key(self.device, id)
    }

    /// Device label text, else the global default
    pub fn button_label_or_default(&self, id: ButtonId) -> Option<&'a str> {
        self.button_label(id)
            .or_else(|| self.catalog.default_button_label(id))
    }

    /// Device label text, else the global default
    pub fn trigger_label_or_default(&self, id: TriggerId) -> Option<&'a str> {
        self.trigger_label(id)
            .or_else(|| self.catalog.default_trigger_label(id))
    }
}
