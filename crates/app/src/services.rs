//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod reading_aggregator;
pub mod settlement_service;
pub mod tariff_resolver;

#[cfg(test)]
pub(crate) mod fakes;
