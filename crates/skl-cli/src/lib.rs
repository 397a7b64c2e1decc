//! # skl-cli — CLI Tool for the Skladno Compliance Stack
//!
//! Provides the `skladno` command-line interface.
//!
//! ## Subcommands
//!
//! - `skladno alerts` — Aggregate the needs-attention feed from a record
//!   snapshot file (or demo rows) and print it as JSON.
//! - `skladno check` — Validate a record snapshot file and report
//!   records that violate register invariants.
//! - `skladno serve` — Run the HTTP API server.
//!
//! ```bash
//! skladno alerts --snapshot records.json --at 2026-03-15T10:00:00Z
//! skladno check records.json
//! skladno serve
//! ```

pub mod alerts;
pub mod check;
pub mod serve;
