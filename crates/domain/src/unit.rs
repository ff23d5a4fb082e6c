//! Unit: a metered point in an energy-sharing network.

use serde::{Deserialize, Serialize};

use crate::error::{SunshareError, ValidationError};
use crate::id::{NetworkId, UnitId};

/// Role of a unit within its network.
///
/// Determines whether the unit's aggregated reading counts toward network
/// consumption or network generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Consumer,
    Generator,
}

impl UnitKind {
    /// Stable lowercase name, used for storage and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Generator => "generator",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consumer" => Ok(Self::Consumer),
            "generator" => Ok(Self::Generator),
            other => Err(ValidationError::UnknownUnitKind(other.to_string())),
        }
    }
}

/// A metered consumer or generator owned by a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    pub network_id: NetworkId,
}

impl Unit {
    /// Create a builder for constructing a [`Unit`].
    #[must_use]
    pub fn builder() -> UnitBuilder {
        UnitBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), SunshareError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Unit`].
#[derive(Debug, Default)]
pub struct UnitBuilder {
    id: Option<UnitId>,
    name: Option<String>,
    kind: Option<UnitKind>,
    network_id: Option<NetworkId>,
}

impl UnitBuilder {
    #[must_use]
    pub fn id(mut self, id: UnitId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: UnitKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn network_id(mut self, network_id: NetworkId) -> Self {
        self.network_id = Some(network_id);
        self
    }

    /// Consume the builder, validate, and return a [`Unit`].
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] if `kind` or `network_id` was
    /// never set, or if `name` is missing or empty.
    pub fn build(self) -> Result<Unit, SunshareError> {
        let kind = self.kind.ok_or(ValidationError::MissingField("kind"))?;
        let network_id = self
            .network_id
            .ok_or(ValidationError::MissingField("network_id"))?;
        let unit = Unit {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            kind,
            network_id,
        };
        unit.validate()?;
        Ok(unit)
    }
}
