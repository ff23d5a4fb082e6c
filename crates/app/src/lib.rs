//! # sunshare-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UnitRepository`: units belonging to a network
//!   - `ReadingRepository`: metered readings per unit and time range
//!   - `TariffRepository`: tariff history per network
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ReadingAggregator`: bounded-concurrency fan-out over unit readings
//!   - `TariffResolver`: history-aware rate lookup
//!   - `SettlementService`: the full per-period network settlement
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `sunshare-domain` only (plus `tokio` for tasks, semaphores, and timeouts).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
