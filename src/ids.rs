//! Portable semantic identifiers for gamepad controls
//!
//! Every device-specific raw code resolves to one of these closed sets of
//! names. The canonical name of each identifier is exactly its variant name
//! (`A`, `LeftShoulder`, `RightTrigger`, ...) and name lookup is a
//! case-sensitive exact match: no aliases, no fuzzy matching.
//!
//! ```text
//!         [Y]
//!     [X]     [B]        ButtonId face buttons
//!         [A]
//!
//!   LeftStick.X / LeftStick.Y      StickId + StickAxis (two raw axis slots)
//!   LeftTrigger / RightTrigger     TriggerId (one raw axis slot)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name did not match any member of a semantic identifier set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{name}' is not a recognized {kind} name")]
pub struct UnknownSemanticId {
    /// Identifier set that was searched ("button", "trigger" or "stick")
    pub kind: &'static str,
    /// The rejected name
    pub name: String,
}

macro_rules! semantic_id {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every member, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name used in mapping resources
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Resolve a canonical name (case-sensitive)
            pub fn from_name(name: &str) -> Result<Self, UnknownSemanticId> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|id| id.name() == name)
                    .ok_or_else(|| UnknownSemanticId {
                        kind: $kind,
                        name: name.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = UnknownSemanticId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s)
            }
        }
    };
}

semantic_id! {
    /// Digital buttons
    ButtonId, "button" {
        A,
        B,
        X,
        Y,
        LeftShoulder,
        RightShoulder,
        /// Left stick click
        LeftStick,
        /// Right stick click
        RightStick,
        Back,
        Start,
        Home,
        Menu,
        DpadUp,
        DpadDown,
        DpadLeft,
        DpadRight,
    }
}

semantic_id! {
    /// Analog triggers (one raw axis each)
    TriggerId, "trigger" {
        LeftTrigger,
        RightTrigger,
    }
}

semantic_id! {
    /// Analog sticks (two raw axes each)
    StickId, "stick" {
        LeftStick,
        RightStick,
    }
}

/// One of the two axes of a stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickAxis {
    X,
    Y,
}

impl StickAxis {
    pub fn name(self) -> &'static str {
        match self {
            StickAxis::X => "X",
            StickAxis::Y => "Y",
        }
    }
}

/// A stick mapping name split into stick and axis, e.g. `LeftStick.X`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickSlot {
    pub stick: StickId,
    pub axis: StickAxis,
}

impl StickSlot {
    /// Parse a stick mapping name of the form `<StickId>.<X|Y>`
    ///
    /// The stick part is everything before the last dot, so the axis is
    /// always the final segment.
    pub fn parse(name: &str) -> Result<Self, UnknownSemanticId> {
        let unknown = || UnknownSemanticId {
            kind: "stick",
            name: name.to_string(),
        };

        let (stick, axis) = name.rsplit_once('.').ok_or_else(unknown)?;
        let stick = StickId::from_name(stick).map_err(|_| unknown())?;
        let axis = match axis {
            "X" => StickAxis::X,
            "Y" => StickAxis::Y,
            _ => return Err(unknown()),
        };

        Ok(Self { stick, axis })
    }
}

impl fmt::Display for StickSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stick, self.axis.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for id in ButtonId::ALL {
            assert_eq!(ButtonId::from_name(id.name()), Ok(*id));
        }
        for id in TriggerId::ALL {
            assert_eq!(id.name().parse::<TriggerId>(), Ok(*id));
        }
        for id in StickId::ALL {
            assert_eq!(StickId::from_name(&id.to_string()), Ok(*id));
        }
    }

    #[test]
    fn test_name_lookup_is_case_sensitive() {
        assert_eq!(ButtonId::from_name("A"), Ok(ButtonId::A));
        let err = ButtonId::from_name("a").unwrap_err();
        assert_eq!(err.kind, "button");
        assert_eq!(err.name, "a");

        assert!(TriggerId::from_name("lefttrigger").is_err());
        assert!(TriggerId::from_name("LT").is_err());
    }

    #[test]
    fn test_unknown_name_message() {
        let err = StickId::from_name("MiddleStick").unwrap_err();
        assert_eq!(err.to_string(), "'MiddleStick' is not a recognized stick name");
    }

    #[test]
    fn test_stick_slot_parsing() {
        assert_eq!(
            StickSlot::parse("LeftStick.X"),
            Ok(StickSlot { stick: StickId::LeftStick, axis: StickAxis::X })
        );
        assert_eq!(
            StickSlot::parse("RightStick.Y").unwrap().to_string(),
            "RightStick.Y"
        );
        assert!(StickSlot::parse("LeftStick").is_err());
        assert!(StickSlot::parse("LeftStick.Z").is_err());
        assert!(StickSlot::parse("Left.X").is_err());
    }
}
