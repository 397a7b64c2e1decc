//! # Alert Aggregation Rules
//!
//! The per-domain inclusion rules and the feed assembly. Each rule is
//! evaluated independently per record; a record contributes at most one
//! alert.
//!
//! ## Inclusion Rules
//!
//! | Domain | Rule |
//! |---|---|
//! | Security incidents | unresolved AND age > 1 day |
//! | Whistleblower reports | unresolved AND (confirmation countdown < 3 OR 0 <= resolution countdown < 3) |
//! | Erasure requests | not executed AND response countdown < 0 |
//! | Licenses (expiring) | active AND 0 <= expiry countdown <= 30 |
//! | Licenses (expired) | active AND expiry countdown < 0 |
//! | Licenses (over-utilized) | active AND seats tracked AND utilization >= 90% |
//!
//! The resolution-deadline arm requires a **non-negative** countdown while
//! the confirmation and erasure arms do not: a resolution deadline that has
//! already elapsed drops off this feed (a downstream escalation workflow
//! owns it from there). Do not "fix" this asymmetry — thresholds and tests
//! pin it.

use skl_core::{days_since, days_until, AlertDomain, Timestamp};
use skl_records::{
    ErasureRequest, SecurityIncident, SoftwareLicense, WhistleblowerReport,
    license::EXPIRY_WARNING_DAYS,
};

use crate::alert::{Alert, AlertFeed, AlertLabel, DomainCounts};

/// Incident age in whole days strictly above which an unresolved incident
/// alerts.
pub const INCIDENT_AGE_THRESHOLD_DAYS: i64 = 1;

/// Whistleblower deadlines alert when the countdown drops below this many
/// days.
pub const REPORT_WINDOW_DAYS: i64 = 3;

/// An immutable snapshot of the four record collections for one
/// organization.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Security incident register.
    #[serde(default)]
    pub incidents: Vec<SecurityIncident>,
    /// Whistleblower reports.
    #[serde(default)]
    pub reports: Vec<WhistleblowerReport>,
    /// Erasure requests.
    #[serde(default)]
    pub erasure_requests: Vec<ErasureRequest>,
    /// Software license register.
    #[serde(default)]
    pub licenses: Vec<SoftwareLicense>,
}

impl Snapshot {
    /// Whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
            && self.reports.is_empty()
            && self.erasure_requests.is_empty()
            && self.licenses.is_empty()
    }
}

/// Aggregate a snapshot into the ranked alert feed.
///
/// Pure over `(snapshot, now)`: no clock reads, no mutation, idempotent.
pub fn aggregate(snapshot: &Snapshot, now: Timestamp) -> AlertFeed {
    let mut security_incidents: Vec<Alert> = snapshot
        .incidents
        .iter()
        .filter_map(|i| incident_alert(i, now))
        .collect();
    let mut whistleblower_reports: Vec<Alert> = snapshot
        .reports
        .iter()
        .filter_map(|r| report_alert(r, now))
        .collect();
    let mut erasure_requests: Vec<Alert> = snapshot
        .erasure_requests
        .iter()
        .filter_map(|e| erasure_alert(e, now))
        .collect();
    let mut software_licenses: Vec<Alert> = snapshot
        .licenses
        .iter()
        .filter_map(|l| license_alert(l, now))
        .collect();

    rank(&mut security_incidents);
    rank(&mut whistleblower_reports);
    rank(&mut erasure_requests);
    rank(&mut software_licenses);

    let counts = DomainCounts {
        security_incidents: security_incidents.len(),
        whistleblower_reports: whistleblower_reports.len(),
        erasure_requests: erasure_requests.len(),
        software_licenses: software_licenses.len(),
        total: security_incidents.len()
            + whistleblower_reports.len()
            + erasure_requests.len()
            + software_licenses.len(),
    };

    AlertFeed {
        security_incidents,
        whistleblower_reports,
        erasure_requests,
        software_licenses,
        counts,
    }
}

/// Sort ascending by day figure; entries without a figure go last. The
/// stable sort preserves snapshot order among ties, keeping the feed
/// deterministic.
fn rank(alerts: &mut [Alert]) {
    alerts.sort_by_key(|a| (a.days.is_none(), a.days));
}

/// Unresolved incidents strictly older than the age threshold.
fn incident_alert(incident: &SecurityIncident, now: Timestamp) -> Option<Alert> {
    if incident.status.is_terminal() {
        return None;
    }
    let age = days_since(incident.detected_at, now);
    if age <= INCIDENT_AGE_THRESHOLD_DAYS {
        return None;
    }
    Some(Alert {
        domain: AlertDomain::SecurityIncidents,
        record_id: incident.id,
        days: Some(age),
        label: AlertLabel::IncidentAge,
    })
}

/// Unresolved reports with a qualifying confirmation or resolution
/// deadline. When both qualify, the smaller non-negative countdown is
/// displayed; ties prefer confirmation.
fn report_alert(report: &WhistleblowerReport, now: Timestamp) -> Option<Alert> {
    if report.status.is_terminal() {
        return None;
    }

    // Confirmation arm: countdown below the window, overdue included.
    let confirmation = report
        .confirmation_due_at
        .map(|due| days_until(due, now))
        .filter(|d| *d < REPORT_WINDOW_DAYS);

    // Resolution arm: countdown inside [0, window) — an elapsed resolution
    // deadline does not qualify.
    let resolution = report
        .resolution_due_at
        .map(|due| days_until(due, now))
        .filter(|d| (0..REPORT_WINDOW_DAYS).contains(d));

    let (days, label) = match (confirmation, resolution) {
        (Some(c), Some(r)) => {
            // Nearer non-negative deadline wins; equal countdowns prefer
            // confirmation. An overdue confirmation leaves resolution as
            // the only non-negative figure.
            if c >= 0 && c <= r {
                (c, AlertLabel::Confirmation)
            } else {
                (r, AlertLabel::Resolution)
            }
        }
        (Some(c), None) => (c, AlertLabel::Confirmation),
        (None, Some(r)) => (r, AlertLabel::Resolution),
        (None, None) => return None,
    };

    Some(Alert {
        domain: AlertDomain::WhistleblowerReports,
        record_id: report.id,
        days: Some(days),
        label,
    })
}

/// Non-executed requests whose response deadline has passed.
fn erasure_alert(request: &ErasureRequest, now: Timestamp) -> Option<Alert> {
    if request.status == skl_records::ErasureStatus::Executed {
        return None;
    }
    let due = request.response_due_at?;
    let countdown = days_until(due, now);
    if countdown >= 0 {
        return None;
    }
    Some(Alert {
        domain: AlertDomain::ErasureRequests,
        record_id: request.id,
        days: Some(countdown),
        label: AlertLabel::ResponseOverdue,
    })
}

/// Active licenses, one alert per record, by precedence:
/// expired > expiring > over-utilized.
fn license_alert(license: &SoftwareLicense, now: Timestamp) -> Option<Alert> {
    if !license.status.is_alertable() {
        return None;
    }

    if let Some(expires) = license.expires_at {
        let countdown = days_until(expires, now);
        if countdown < 0 {
            return Some(Alert {
                domain: AlertDomain::SoftwareLicenses,
                record_id: license.id,
                days: Some(countdown),
                label: AlertLabel::Expired,
            });
        }
        if countdown <= EXPIRY_WARNING_DAYS {
            return Some(Alert {
                domain: AlertDomain::SoftwareLicenses,
                record_id: license.id,
                days: Some(countdown),
                label: AlertLabel::Expiring,
            });
        }
    }

    if license.is_over_utilized() {
        return Some(Alert {
            domain: AlertDomain::SoftwareLicenses,
            record_id: license.id,
            days: None,
            label: AlertLabel::OverUtilized,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use skl_core::OrganizationId;
    use skl_records::{ErasureStatus, IncidentStatus, SwLicenseStatus};

    const NOW: i64 = 1_772_000_000;
    const DAY: i64 = 86_400;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_epoch_secs(secs).unwrap()
    }

    fn incident(detected_offset_days: i64, status: IncidentStatus) -> SecurityIncident {
        let mut inc = SecurityIncident::new(
            OrganizationId::new(),
            ts(NOW - detected_offset_days * DAY),
            ts(NOW),
        )
        .unwrap();
        inc.status = status;
        inc
    }

    fn license(expires_offset_days: Option<i64>, total: u32, used: u32) -> SoftwareLicense {
        SoftwareLicense::new(
            OrganizationId::new(),
            expires_offset_days.map(|d| ts(NOW + d * DAY)),
            total,
            used,
        )
    }

    // ── Per-rule behavior ────────────────────────────────────────────

    #[test]
    fn test_incident_threshold_is_strict() {
        // Exactly 1 day old: below threshold, excluded.
        assert!(incident_alert(&incident(1, IncidentStatus::Open), ts(NOW)).is_none());
        // 2 days old: included with the age as the figure.
        let alert = incident_alert(&incident(2, IncidentStatus::Open), ts(NOW)).unwrap();
        assert_eq!(alert.days, Some(2));
        assert_eq!(alert.label, AlertLabel::IncidentAge);
    }

    #[test]
    fn test_resolved_incident_excluded_regardless_of_age() {
        assert!(incident_alert(&incident(100, IncidentStatus::Resolved), ts(NOW)).is_none());
    }

    #[test]
    fn test_license_precedence_expired_over_overutilized() {
        // Expired AND over-utilized: a single Expired alert.
        let alert = license_alert(&license(Some(-2), 10, 10), ts(NOW)).unwrap();
        assert_eq!(alert.label, AlertLabel::Expired);
        assert_eq!(alert.days, Some(-2));
    }

    #[test]
    fn test_license_expiring_window_inclusive() {
        let at_edge = license_alert(&license(Some(30), 10, 1), ts(NOW)).unwrap();
        assert_eq!(at_edge.label, AlertLabel::Expiring);
        assert_eq!(at_edge.days, Some(30));
        assert!(license_alert(&license(Some(31), 10, 1), ts(NOW)).is_none());
    }

    #[test]
    fn test_license_overutilized_without_expiry() {
        let alert = license_alert(&license(None, 10, 9), ts(NOW)).unwrap();
        assert_eq!(alert.label, AlertLabel::OverUtilized);
        assert_eq!(alert.days, None);
    }

    #[test]
    fn test_inactive_license_never_alerts() {
        let mut lic = license(Some(-5), 10, 10);
        lic.status = SwLicenseStatus::Cancelled;
        assert!(license_alert(&lic, ts(NOW)).is_none());
    }

    #[test]
    fn test_report_tie_prefers_confirmation() {
        let mut report =
            WhistleblowerReport::without_deadlines(OrganizationId::new(), ts(NOW - 10 * DAY));
        report.confirmation_due_at = Some(ts(NOW + 2 * DAY));
        report.resolution_due_at = Some(ts(NOW + 2 * DAY));
        let alert = report_alert(&report, ts(NOW)).unwrap();
        assert_eq!(alert.label, AlertLabel::Confirmation);
        assert_eq!(alert.days, Some(2));
    }

    #[test]
    fn test_report_overdue_confirmation_yields_resolution_figure() {
        // Confirmation overdue, resolution inside the window: both arms
        // qualify, the non-negative resolution figure is displayed.
        let mut report =
            WhistleblowerReport::without_deadlines(OrganizationId::new(), ts(NOW - 10 * DAY));
        report.confirmation_due_at = Some(ts(NOW - 2 * DAY));
        report.resolution_due_at = Some(ts(NOW + DAY));
        let alert = report_alert(&report, ts(NOW)).unwrap();
        assert_eq!(alert.label, AlertLabel::Resolution);
        assert_eq!(alert.days, Some(1));
    }

    #[test]
    fn test_report_no_deadlines_excluded() {
        let report =
            WhistleblowerReport::without_deadlines(OrganizationId::new(), ts(NOW - 100 * DAY));
        assert!(report_alert(&report, ts(NOW)).is_none());
    }

    #[test]
    fn test_erasure_includes_only_overdue() {
        let mut req =
            ErasureRequest::with_statutory_deadline(OrganizationId::new(), ts(NOW - 40 * DAY));
        req.status = ErasureStatus::Processing;
        // Due 10 days ago: included with the signed countdown.
        let alert = erasure_alert(&req, ts(NOW)).unwrap();
        assert_eq!(alert.days, Some(-10));
        assert_eq!(alert.label, AlertLabel::ResponseOverdue);

        // Due tomorrow: excluded.
        req.response_due_at = Some(ts(NOW + DAY));
        assert!(erasure_alert(&req, ts(NOW)).is_none());
    }

    #[test]
    fn test_erasure_rejected_still_alerts() {
        // Rejected is terminal for the record lifecycle but only Executed
        // leaves the feed.
        let mut req =
            ErasureRequest::with_statutory_deadline(OrganizationId::new(), ts(NOW - 40 * DAY));
        req.status = ErasureStatus::Rejected;
        assert!(erasure_alert(&req, ts(NOW)).is_some());
        req.status = ErasureStatus::Executed;
        assert!(erasure_alert(&req, ts(NOW)).is_none());
    }

    // ── Feed assembly ────────────────────────────────────────────────

    #[test]
    fn test_empty_snapshot_yields_zero_counts() {
        let feed = aggregate(&Snapshot::default(), ts(NOW));
        assert_eq!(feed.counts.total, 0);
        for (_, list) in feed.domain_lists() {
            assert!(list.is_empty());
        }
    }

    #[test]
    fn test_feed_sorted_ascending_with_none_last() {
        let snapshot = Snapshot {
            licenses: vec![
                license(Some(20), 10, 1),
                license(None, 10, 10),
                license(Some(-3), 10, 1),
                license(Some(5), 10, 1),
            ],
            ..Snapshot::default()
        };
        let feed = aggregate(&snapshot, ts(NOW));
        let figures: Vec<Option<i64>> =
            feed.software_licenses.iter().map(|a| a.days).collect();
        assert_eq!(figures, vec![Some(-3), Some(5), Some(20), None]);
    }

    #[test]
    fn test_counts_match_list_lengths() {
        let snapshot = Snapshot {
            incidents: vec![
                incident(3, IncidentStatus::Open),
                incident(5, IncidentStatus::Investigating),
                incident(50, IncidentStatus::Resolved),
            ],
            licenses: vec![license(Some(10), 10, 1)],
            ..Snapshot::default()
        };
        let feed = aggregate(&snapshot, ts(NOW));
        assert_eq!(feed.counts.security_incidents, 2);
        assert_eq!(feed.counts.software_licenses, 1);
        assert_eq!(feed.counts.total, 3);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let snapshot = Snapshot {
            incidents: vec![incident(4, IncidentStatus::Open)],
            licenses: vec![license(Some(2), 10, 10), license(None, 4, 4)],
            ..Snapshot::default()
        };
        let first = aggregate(&snapshot, ts(NOW));
        let second = aggregate(&snapshot, ts(NOW));
        assert_eq!(first, second);
    }

    // ── Property tests ───────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_total_is_sum_of_domain_counts(
            seats in proptest::collection::vec((1u32..20, 0u32..25), 0..8),
            expiries in proptest::collection::vec(-60_i64..120, 0..8),
        ) {
            let mut licenses: Vec<SoftwareLicense> =
                seats.into_iter().map(|(t, u)| license(None, t, u)).collect();
            licenses.extend(expiries.into_iter().map(|d| license(Some(d), 10, 1)));
            let feed = aggregate(
                &Snapshot { licenses, ..Snapshot::default() },
                ts(NOW),
            );
            prop_assert_eq!(
                feed.counts.total,
                feed.counts.security_incidents
                    + feed.counts.whistleblower_reports
                    + feed.counts.erasure_requests
                    + feed.counts.software_licenses
            );
            prop_assert_eq!(feed.counts.software_licenses, feed.software_licenses.len());
        }

        #[test]
        fn prop_aggregate_deterministic(offsets in proptest::collection::vec(2_i64..50, 0..10)) {
            let snapshot = Snapshot {
                incidents: offsets
                    .iter()
                    .map(|d| incident(*d, IncidentStatus::Open))
                    .collect(),
                ..Snapshot::default()
            };
            let a = aggregate(&snapshot, ts(NOW));
            let b = aggregate(&snapshot, ts(NOW));
            prop_assert_eq!(a, b);
        }
    }

}
