//! # skl-records — Record Models for the Skladno Stack
//!
//! Plain data models for the four regulatory record domains, plus the DPIA
//! assessment logic. Each entity carries only the fields the deadline/alert
//! core consumes, alongside its identity and tenancy keys.
//!
//! ## Boundary Validation
//!
//! Records arrive from an external store as loosely-typed rows. Validation
//! happens ONCE, at the store-client boundary, through the validating
//! constructors here. Past that point the types are trusted: optional dates
//! are `Option<Timestamp>` and the pure core asks nothing beyond "is this
//! field present".
//!
//! ## Lifecycle
//!
//! Entities are created and mutated exclusively through the store and its
//! CRUD surface. Nothing in this crate or downstream of it mutates a record
//! as part of alert computation.

pub mod dpia;
pub mod erasure;
pub mod incident;
pub mod license;
pub mod whistleblow;

pub use dpia::{RiskLevel, WizardError, WizardForm, WizardStep, risk_level};
pub use erasure::{ErasureRequest, ErasureStatus};
pub use incident::{IncidentError, IncidentStatus, SecurityIncident};
pub use license::{SoftwareLicense, SwLicenseStatus, OVER_UTILIZATION_THRESHOLD};
pub use whistleblow::{ReportStatus, WhistleblowerReport};
