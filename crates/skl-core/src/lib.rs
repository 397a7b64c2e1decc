//! # skl-core — Foundational Types for the Skladno Stack
//!
//! This crate is the bedrock of the Skladno compliance stack. It defines the
//! type-system primitives shared by every other crate in the workspace; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `OrganizationId` and
//!    `RecordId` are validated newtypes. No bare strings or bare UUIDs for
//!    identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Local offsets are rejected at
//!    construction, never silently converted.
//!
//! 3. **Deadline arithmetic is pure and total.** `days_since()` and
//!    `days_until()` take the clock as an argument and have no error cases.
//!    Absent deadlines are skipped by callers, never coerced to zero.
//!
//! 4. **Single `AlertDomain` enum.** One definition, four variants,
//!    exhaustive `match` everywhere. Adding a record domain forces every
//!    consumer to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `skl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod deadline;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use deadline::{days_since, days_until};
pub use domain::{AlertDomain, ALERT_DOMAIN_COUNT};
pub use error::SklError;
pub use identity::{OrganizationId, RecordId};
pub use temporal::Timestamp;
