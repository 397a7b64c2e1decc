//! # Data Source Taxonomy
//!
//! Where a snapshot came from is an explicit, caller-visible decision.
//! When a fetch fails or returns nothing, the caller chooses between an
//! empty feed and fallback demo rows — the aggregation logic itself never
//! substitutes data.

use serde::{Deserialize, Serialize};

use skl_alerts::Snapshot;
use skl_core::{OrganizationId, Timestamp};
use skl_records::{
    ErasureRequest, SecurityIncident, SoftwareLicense, WhistleblowerReport,
};

/// A snapshot tagged with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSource {
    /// Fetched from the live record store.
    Live {
        /// The fetched records.
        snapshot: Snapshot,
    },
    /// Nothing available; render an empty feed.
    Empty,
    /// Caller-chosen demo rows standing in for unavailable live data.
    Fallback {
        /// The substituted records.
        snapshot: Snapshot,
    },
}

impl DataSource {
    /// The records to aggregate, whatever their provenance.
    pub fn snapshot(&self) -> Snapshot {
        match self {
            Self::Live { snapshot } | Self::Fallback { snapshot } => snapshot.clone(),
            Self::Empty => Snapshot::default(),
        }
    }

    /// Whether the data is substituted rather than live.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Deterministic demo rows for one organization: one aging incident, one
/// report approaching its resolution deadline, one overdue erasure request,
/// and one over-utilized license. Each produces exactly one alert, which
/// gives a fallback feed something to show.
pub fn demo_snapshot(org: OrganizationId, now: Timestamp) -> Snapshot {
    let incident = SecurityIncident {
        id: skl_core::RecordId::new(),
        organization_id: org,
        detected_at: now.plus_days(-3),
        status: skl_records::IncidentStatus::Open,
    };

    let mut report = WhistleblowerReport::without_deadlines(org, now.plus_days(-88));
    report.resolution_due_at = Some(now.plus_days(2));

    let mut erasure = ErasureRequest::with_statutory_deadline(org, now.plus_days(-37));
    erasure.status = skl_records::ErasureStatus::Processing;

    let license = SoftwareLicense::new(org, None, 10, 10);

    Snapshot {
        incidents: vec![incident],
        reports: vec![report],
        erasure_requests: vec![erasure],
        licenses: vec![license],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skl_alerts::aggregate;

    fn now() -> Timestamp {
        Timestamp::parse("2026-03-15T10:00:00Z").unwrap()
    }

    #[test]
    fn test_empty_source_yields_empty_snapshot() {
        let source = DataSource::Empty;
        assert!(source.snapshot().is_empty());
        assert!(!source.is_fallback());
    }

    #[test]
    fn test_fallback_is_flagged() {
        let source = DataSource::Fallback {
            snapshot: demo_snapshot(OrganizationId::new(), now()),
        };
        assert!(source.is_fallback());
    }

    #[test]
    fn test_demo_snapshot_alerts_in_every_domain() {
        let feed = aggregate(&demo_snapshot(OrganizationId::new(), now()), now());
        assert_eq!(feed.counts.security_incidents, 1);
        assert_eq!(feed.counts.whistleblower_reports, 1);
        assert_eq!(feed.counts.erasure_requests, 1);
        assert_eq!(feed.counts.software_licenses, 1);
        assert_eq!(feed.counts.total, 4);
    }

    #[test]
    fn test_source_serde_tagging() {
        let json = serde_json::to_string(&DataSource::Empty).unwrap();
        assert_eq!(json, r#"{"source":"empty"}"#);
        let live = DataSource::Live {
            snapshot: Snapshot::default(),
        };
        let parsed: DataSource = serde_json::from_str(&serde_json::to_string(&live).unwrap()).unwrap();
        assert!(!parsed.is_fallback());
    }
}
