//! Reading: a single metered kWh value recorded for a unit.

use serde::{Deserialize, Serialize};

use crate::error::{SunshareError, ValidationError};
use crate::id::{ReadingId, UnitId};
use crate::time::Timestamp;

/// An immutable metered quantity, in kWh, recorded at `recorded_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    pub unit_id: UnitId,
    pub value_kwh: f64,
    pub recorded_at: Timestamp,
}

impl Reading {
    /// Create a builder for constructing a [`Reading`].
    #[must_use]
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] when the value is negative or not finite.
    pub fn validate(&self) -> Result<(), SunshareError> {
        if !self.value_kwh.is_finite() || self.value_kwh < 0.0 {
            return Err(ValidationError::InvalidReadingValue(self.value_kwh).into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Reading`].
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<ReadingId>,
    unit_id: Option<UnitId>,
    value_kwh: f64,
    recorded_at: Option<Timestamp>,
}

impl ReadingBuilder {
    #[must_use]
    pub fn id(mut self, id: ReadingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn unit_id(mut self, unit_id: UnitId) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    #[must_use]
    pub fn value_kwh(mut self, value_kwh: f64) -> Self {
        self.value_kwh = value_kwh;
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder, validate, and return a [`Reading`].
    ///
    /// # Errors
    ///
    /// Returns [`SunshareError::Validation`] if the value is negative or not finite.
    pub fn build(self) -> Result<Reading, SunshareError> {
        let reading = Reading {
            id: self.id.unwrap_or_default(),
            unit_id: self.unit_id.unwrap_or_default(),
            value_kwh: self.value_kwh,
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        };
        reading.validate()?;
        Ok(reading)
    }
}
