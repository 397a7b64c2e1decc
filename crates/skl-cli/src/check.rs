//! # Check Subcommand
//!
//! Validates a record snapshot file against the register invariants and
//! prints a per-register report. Parsing already enforces the wire shape
//! (status vocabularies, timestamp format); this pass flags records that
//! parse but violate register rules.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use skl_alerts::Snapshot;
use skl_core::Timestamp;

/// Arguments for the `skladno check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Record snapshot file (JSON) to validate.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Clock override for future-dated checks (ISO8601, UTC with `Z`
    /// suffix). Defaults to now.
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every record passes, 1 on findings, 2 on
/// operational error.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read record file {}", args.path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse record file {}", args.path.display()))?;
    let now = match args.at {
        Some(ref s) => Timestamp::parse(s).context("invalid --at timestamp")?,
        None => Timestamp::now(),
    };

    let findings = findings(&snapshot, now);

    println!(
        "Incidents: {}, reports: {}, erasure requests: {}, licenses: {}",
        snapshot.incidents.len(),
        snapshot.reports.len(),
        snapshot.erasure_requests.len(),
        snapshot.licenses.len()
    );
    for finding in &findings {
        println!("  FAIL: {finding}");
    }

    if findings.is_empty() {
        println!("All records passed.");
        Ok(0)
    } else {
        println!("\n{} record(s) failed validation.", findings.len());
        Ok(1)
    }
}

/// Collect invariant violations across all registers.
fn findings(snapshot: &Snapshot, now: Timestamp) -> Vec<String> {
    let mut findings = Vec::new();

    for incident in &snapshot.incidents {
        if incident.detected_at.epoch_secs() > now.epoch_secs() {
            findings.push(format!(
                "incident {}: detected_at {} lies in the future",
                incident.id,
                incident.detected_at.to_iso8601()
            ));
        }
    }

    for report in &snapshot.reports {
        if let Some(due) = report.confirmation_due_at {
            if due.epoch_secs() < report.filed_at.epoch_secs() {
                findings.push(format!(
                    "report {}: confirmation_due_at precedes filed_at",
                    report.id
                ));
            }
        }
        if let Some(due) = report.resolution_due_at {
            if due.epoch_secs() < report.filed_at.epoch_secs() {
                findings.push(format!(
                    "report {}: resolution_due_at precedes filed_at",
                    report.id
                ));
            }
        }
        if let (Some(confirmation), Some(resolution)) =
            (report.confirmation_due_at, report.resolution_due_at)
        {
            if resolution.epoch_secs() < confirmation.epoch_secs() {
                findings.push(format!(
                    "report {}: resolution_due_at precedes confirmation_due_at",
                    report.id
                ));
            }
        }
    }

    for license in &snapshot.licenses {
        if license.seats_used > license.seats_total && license.seats_total > 0 {
            findings.push(format!(
                "license {}: seats_used {} exceeds seats_total {}",
                license.id, license.seats_used, license.seats_total
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use skl_core::OrganizationId;
    use skl_records::{SoftwareLicense, WhistleblowerReport};
    use skl_store::demo_snapshot;

    fn now() -> Timestamp {
        Timestamp::parse("2026-03-15T10:00:00Z").unwrap()
    }

    #[test]
    fn test_demo_snapshot_is_clean() {
        let snapshot = demo_snapshot(OrganizationId::new(), now());
        assert!(findings(&snapshot, now()).is_empty());
    }

    #[test]
    fn test_future_incident_is_flagged() {
        let mut snapshot = demo_snapshot(OrganizationId::new(), now());
        snapshot.incidents[0].detected_at = now().plus_days(1);
        let findings = findings(&snapshot, now());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("future"));
    }

    #[test]
    fn test_unordered_report_deadlines_are_flagged() {
        let org = OrganizationId::new();
        let mut report = WhistleblowerReport::with_statutory_deadlines(org, now());
        std::mem::swap(
            &mut report.confirmation_due_at,
            &mut report.resolution_due_at,
        );
        let snapshot = Snapshot {
            reports: vec![report],
            ..Snapshot::default()
        };
        let findings = findings(&snapshot, now());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("resolution_due_at precedes confirmation_due_at"));
    }

    #[test]
    fn test_overbooked_license_is_flagged() {
        let license = SoftwareLicense::new(OrganizationId::new(), None, 5, 7);
        let snapshot = Snapshot {
            licenses: vec![license],
            ..Snapshot::default()
        };
        let findings = findings(&snapshot, now());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("exceeds seats_total"));
    }

    #[test]
    fn test_untracked_seats_are_not_flagged() {
        let license = SoftwareLicense::new(OrganizationId::new(), None, 0, 3);
        let snapshot = Snapshot {
            licenses: vec![license],
            ..Snapshot::default()
        };
        assert!(findings(&snapshot, now()).is_empty());
    }
}
