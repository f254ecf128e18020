//! Device identity shared by every mapping table
//!
//! A device identity names a controller *model*, not a physical unit: two
//! pads of the same make share one identity and therefore one set of tables.
//! The identity packs the USB vendor ID into the upper 16 bits and the product
//! ID into the lower 16 bits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MappingError;

/// Property key holding the hexadecimal vendor ID
pub const VENDOR_ID_KEY: &str = "vendor.id";

/// Property key holding the hexadecimal product ID
pub const PRODUCT_ID_KEY: &str = "product.id";

/// Packed `(vendor << 16) | product` controller model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceIdentity(u32);

impl DeviceIdentity {
    /// Pack a vendor/product pair
    pub const fn new(vendor: u16, product: u16) -> Self {
        Self(((vendor as u32) << 16) | product as u32)
    }

    /// Parse the unprefixed hexadecimal `vendor.id` and `product.id` values
    /// of a mapping resource
    pub fn from_hex(vendor: Option<&str>, product: Option<&str>) -> Result<Self, MappingError> {
        let vendor = parse_hex_id(VENDOR_ID_KEY, vendor)?;
        let product = parse_hex_id(PRODUCT_ID_KEY, product)?;
        Ok(Self::new(vendor, product))
    }

    pub const fn vendor(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn product(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Raw packed value
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for DeviceIdentity {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor(), self.product())
    }
}

fn parse_hex_id(field: &'static str, value: Option<&str>) -> Result<u16, MappingError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(MappingError::MissingIdentifier { field });
    }

    // from_str_radix alone would accept a leading '+'
    if !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MappingError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }

    u16::from_str_radix(value, 16).map_err(|_| MappingError::InvalidIdentifier {
        field,
        value: value.to_string(),
    })
}

/// A connected controller as seen by the polling layer
///
/// The engine only ever needs the model identity; everything platform
/// specific stays on the other side of this trait.
pub trait Controller {
    fn device_identity(&self) -> DeviceIdentity;
}

impl Controller for DeviceIdentity {
    fn device_identity(&self) -> DeviceIdentity {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_packing() {
        let id = DeviceIdentity::new(0x1234, 0x5678);
        assert_eq!(id.as_u32(), 0x1234_5678);
        assert_eq!(id.vendor(), 0x1234);
        assert_eq!(id.product(), 0x5678);
        assert_eq!(id.to_string(), "1234:5678");
    }

    #[test]
    fn test_from_hex() {
        let id = DeviceIdentity::from_hex(Some("045e"), Some("028E")).unwrap();
        assert_eq!(id, DeviceIdentity::new(0x045e, 0x028e));

        let id = DeviceIdentity::from_hex(Some(" ffff "), Some("0")).unwrap();
        assert_eq!(id.as_u32(), 0xFFFF_0000);
    }

    #[test]
    fn test_missing_identifiers() {
        let err = DeviceIdentity::from_hex(None, Some("5678")).unwrap_err();
        assert!(matches!(err, MappingError::MissingIdentifier { field: "vendor.id" }));

        let err = DeviceIdentity::from_hex(Some("1234"), Some("  ")).unwrap_err();
        assert!(matches!(err, MappingError::MissingIdentifier { field: "product.id" }));
    }

    #[test]
    fn test_invalid_hex_names_field() {
        let err = DeviceIdentity::from_hex(Some("zzzz"), Some("5678")).unwrap_err();
        assert!(err.to_string().contains("vendor.id"));
        assert!(matches!(
            err,
            MappingError::InvalidIdentifier { field: "vendor.id", ref value } if value == "zzzz"
        ));

        // Out of 16-bit range
        assert!(DeviceIdentity::from_hex(Some("1234"), Some("10000")).is_err());
        // Prefixes are not accepted
        assert!(DeviceIdentity::from_hex(Some("0x1234"), Some("5678")).is_err());
        assert!(DeviceIdentity::from_hex(Some("+123"), Some("5678")).is_err());
    }

    proptest! {
        #[test]
        fn prop_identity_formula(v in any::<u16>(), p in any::<u16>()) {
            let id = DeviceIdentity::from_hex(Some(&format!("{:x}", v)), Some(&format!("{:X}", p))).unwrap();
            prop_assert_eq!(id.as_u32(), ((v as u32) << 16) | p as u32);
            prop_assert_eq!(id.vendor(), v);
            prop_assert_eq!(id.product(), p);
        }

        #[test]
        fn prop_distinct_pairs_never_collide(a in any::<(u16, u16)>(), b in any::<(u16, u16)>()) {
            prop_assume!(a != b);
            prop_assert_ne!(DeviceIdentity::new(a.0, a.1), DeviceIdentity::new(b.0, b.1));
        }
    }
}
