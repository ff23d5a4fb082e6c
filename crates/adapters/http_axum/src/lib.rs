//! # sunshare-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve network balances as JSON (`/api/networks/{id}/balance`)
//! - Serve the same balance as a CSV export (`/api/networks/{id}/balance/csv`)
//! - Map query strings into settlement periods (driving adapter)
//! - Map settlement errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `sunshare-app` (for port traits and services) and `sunshare-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod export;
pub mod router;
pub mod state;
