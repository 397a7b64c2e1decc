//! # API Route Modules
//!
//! Route modules for the compliance API surface:
//!
//! - `alerts` — the aggregated needs-attention feed and per-domain counts.
//! - `incidents` — security incident register CRUD.
//! - `reports` — whistleblower report CRUD.
//! - `erasures` — erasure request CRUD.
//! - `licenses` — software license register CRUD.
//!
//! Handlers hold no deadline or inclusion logic; they resolve the caller's
//! organization, delegate to the store and the aggregator, and map results
//! to HTTP responses.

pub mod alerts;
pub mod erasures;
pub mod incidents;
pub mod licenses;
pub mod reports;
