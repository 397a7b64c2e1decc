//! # Alerts Subcommand
//!
//! Aggregates the needs-attention feed from a record snapshot file and
//! prints it as JSON. Where the records come from is explicit: a snapshot
//! file yields live data, `--demo` substitutes deterministic demo rows,
//! and neither yields an empty feed.
//!
//! The organization scope comes from `--organization-id`, or from the
//! session provider configured in the environment (`SKLADNO_USER_ID`,
//! `SKLADNO_ORGANIZATION_ID`, `SKLADNO_ACCESS_TOKEN`). Without either,
//! every record in the snapshot is aggregated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use skl_alerts::{aggregate, AlertFeed, Snapshot};
use skl_core::{OrganizationId, Timestamp};
use skl_store::{
    demo_snapshot, DataSource, RetryingSession, Session, SessionError, SessionProvider,
};

/// Arguments for the `skladno alerts` subcommand.
#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Record snapshot file (JSON with incidents, reports,
    /// erasure_requests, and licenses arrays).
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Clock override (ISO8601, UTC with `Z` suffix). Defaults to now.
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,

    /// Organization to scope the feed to.
    #[arg(long, value_name = "UUID")]
    pub organization_id: Option<Uuid>,

    /// Substitute demo rows when no snapshot file is given.
    #[arg(long)]
    pub demo: bool,

    /// Print only the per-domain counts.
    #[arg(long)]
    pub counts: bool,
}

/// Execute the alerts subcommand.
///
/// Returns exit code: 0 on success, 2 on operational error.
pub fn run_alerts(args: &AlertsArgs) -> Result<u8> {
    let now = match args.at {
        Some(ref s) => Timestamp::parse(s).context("invalid --at timestamp")?,
        None => Timestamp::now(),
    };
    let org = resolve_organization(args)?;

    let source = match args.snapshot {
        Some(ref path) => DataSource::Live {
            snapshot: load_snapshot(path)?,
        },
        None if args.demo => DataSource::Fallback {
            snapshot: demo_snapshot(org.unwrap_or_else(OrganizationId::new), now),
        },
        None => DataSource::Empty,
    };
    if source.is_fallback() {
        tracing::warn!("no snapshot file given; showing demo rows");
    }

    let feed = build_feed(&source, org, now);

    let output = if args.counts {
        serde_json::to_string_pretty(&feed.counts)?
    } else {
        serde_json::to_string_pretty(&feed)?
    };
    println!("{output}");

    Ok(0)
}

/// Read and parse a record snapshot file.
fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot file {}", path.display()))
}

/// Aggregate the feed, scoped to one organization when given.
fn build_feed(source: &DataSource, org: Option<OrganizationId>, now: Timestamp) -> AlertFeed {
    let mut snapshot = source.snapshot();
    if let Some(org) = org {
        snapshot.incidents.retain(|r| r.organization_id == org);
        snapshot.reports.retain(|r| r.organization_id == org);
        snapshot.erasure_requests.retain(|r| r.organization_id == org);
        snapshot.licenses.retain(|r| r.organization_id == org);
    }
    aggregate(&snapshot, now)
}

/// Resolve the organization scope: explicit flag first, then the session
/// provider in the environment, then none.
fn resolve_organization(args: &AlertsArgs) -> Result<Option<OrganizationId>> {
    if let Some(id) = args.organization_id {
        return Ok(Some(OrganizationId(id)));
    }
    if std::env::var("SKLADNO_ORGANIZATION_ID").is_err() {
        return Ok(None);
    }
    let session = RetryingSession::new(EnvSession)
        .session()
        .context("failed to acquire session from environment")?;
    Ok(Some(session.organization_id))
}

/// Session provider backed by environment variables.
struct EnvSession;

impl SessionProvider for EnvSession {
    fn fetch_session(&self) -> Result<Session, SessionError> {
        let user_id = require_var("SKLADNO_USER_ID")?;
        let raw_org = require_var("SKLADNO_ORGANIZATION_ID")?;
        let organization_id = OrganizationId::parse(&raw_org)
            .map_err(|e| SessionError::Provider(format!("SKLADNO_ORGANIZATION_ID: {e}")))?;
        let access_token = require_var("SKLADNO_ACCESS_TOKEN")?;
        Ok(Session {
            user_id,
            organization_id,
            access_token,
        })
    }
}

fn require_var(name: &str) -> Result<String, SessionError> {
    std::env::var(name).map_err(|_| SessionError::Provider(format!("{name} not set")))
}
