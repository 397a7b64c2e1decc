//! # skl-alerts — Prioritized Alert Aggregation
//!
//! Combines a snapshot of the four regulatory record collections into one
//! ranked "needs attention" feed with per-domain counts and a grand total.
//!
//! ## Contract
//!
//! - Pure and synchronous: the input is an already-fetched, immutable
//!   [`Snapshot`] and an explicit `now` — no clock reads, no I/O, no
//!   mutation of input records.
//! - Deterministic and idempotent: the same snapshot and `now` always
//!   produce the same feed.
//! - Total: empty collections yield empty lists and zero counts; a record
//!   missing an optional date simply fails the inclusion rule for that
//!   condition, it never raises an error.
//!
//! Fetching the snapshot (and any retry/timeout policy around that fetch)
//! belongs to `skl-store`, not here.

pub mod aggregate;
pub mod alert;

pub use aggregate::{aggregate, Snapshot};
pub use alert::{Alert, AlertFeed, AlertLabel, DomainCounts};
