//! Error types for mapping ingestion and lookup

use thiserror::Error;

use crate::device::DeviceIdentity;
use crate::ids::UnknownSemanticId;

/// Malformed mapping configuration
///
/// Any of these aborts the whole catalog load.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Invalid/missing {field} property in mapping")]
    MissingIdentifier { field: &'static str },

    #[error("Invalid {field} property in mapping: '{value}' is not a 16-bit hexadecimal value")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Not a valid numeric value for '{key}': {value}")]
    InvalidRawCode { key: String, value: String },

    #[error("Property key '{key}' has no semantic name after the prefix")]
    EmptySemanticName { key: String },

    #[error("Invalid semantic ID in property key '{key}'")]
    UnknownSemanticId {
        key: String,
        #[source]
        source: UnknownSemanticId,
    },

    #[error("Device {device} maps {count} stick axes (sticks need an X and a Y axis each)")]
    OddStickAxisCount { device: DeviceIdentity, count: usize },
}

/// Malformed properties text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertiesError {
    #[error("Malformed \\uXXXX escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

/// Query against a device the catalog has no tables for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No mapping tables for device {0}")]
    UnknownDevice(DeviceIdentity),
}
