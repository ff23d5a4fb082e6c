//! Typed identifiers. Each wraps a UUID and serialises as its plain string.
//!
//! Ids are totally ordered so that units sharing a name still sort
//! deterministically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! uuid_id {
    ($(#[doc = $doc:expr])* $name:ident, $label:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Human-readable name used in error messages.
            pub const LABEL: &'static str = $label;

            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId {
                        label: Self::LABEL,
                        value: value.to_owned(),
                    })
            }
        }
    };
}

uuid_id!(
    /// Identifies a metered [`Unit`](crate::unit::Unit).
    UnitId,
    "unit"
);

uuid_id!(
    /// Identifies a network of units settled together.
    NetworkId,
    "network"
);

uuid_id!(
    /// Identifies a single [`Reading`](crate::reading::Reading).
    ReadingId,
    "reading"
);

uuid_id!(
    /// Identifies a [`Tariff`](crate::tariff::Tariff) record.
    TariffId,
    "tariff"
);
