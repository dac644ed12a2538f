//! Type-safe identifier wrappers around the integer ids found in save data.
//!
//! Save files address characters and zones with plain 32-bit integers.
//! Wrapping them keeps a character id from being passed where a zone id
//! is expected, and gives each id family a home for its sentinel value.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around an `i32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i32);

        impl $name {
            /// Return the raw integer value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a saved character (the `<id>` in `save_<id>.sav`).
    CharacterId
}

define_id! {
    /// Identifier of a zone within one session.
    ZoneId
}

impl CharacterId {
    /// Sentinel meaning "no active character".
    pub const NONE: Self = Self(-1);

    /// Whether this is the [`CharacterId::NONE`] sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl ZoneId {
    /// Sentinel parent id carried by top-level zones.
    pub const NO_PARENT: Self = Self(0);

    /// Whether this is the [`ZoneId::NO_PARENT`] sentinel.
    pub const fn is_no_parent(self) -> bool {
        self.0 == Self::NO_PARENT.0
    }
}
