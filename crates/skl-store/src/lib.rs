//! # skl-store — Record-Store Boundary
//!
//! Everything between the pure alert core and the outside world:
//!
//! - [`memory`] — the in-memory store the API serves from, always present.
//! - [`db`] — optional Postgres persistence behind `DATABASE_URL`; when the
//!   variable is absent the stack runs in-memory only.
//! - [`source`] — the explicit `Live` / `Empty` / `Fallback` snapshot
//!   taxonomy. Fallback demo rows are a caller decision, never a silent
//!   substitution inside aggregation.
//! - [`cache`] — snapshot cache keyed by `(Table, OrganizationId)`,
//!   invalidated by explicit events only.
//! - [`notify`] — transport-agnostic "this table may have changed"
//!   notifications.
//! - [`session`] — bounded-retry wrapper around an external identity
//!   provider.
//!
//! ## Boundary Policy
//!
//! Rows are validated once, here. A malformed row is skipped with a logged
//! error and never reaches the core; a fetch failure surfaces as
//! `SklError::Fetch` and the caller decides between an empty and a fallback
//! snapshot.

pub mod cache;
pub mod db;
pub mod memory;
pub mod notify;
pub mod session;
pub mod source;

pub use cache::SnapshotCache;
pub use memory::MemoryStore;
pub use notify::{ChangeEvent, ChangeNotifier, Table};
pub use session::{RetryingSession, Session, SessionError, SessionProvider};
pub use source::{demo_snapshot, DataSource};
