//! End-to-end aggregation scenarios over realistic mixed snapshots.

use skl_alerts::{aggregate, Alert, AlertLabel, Snapshot};
use skl_core::{AlertDomain, OrganizationId, Timestamp};
use skl_records::{
    ErasureRequest, ErasureStatus, IncidentStatus, ReportStatus, SecurityIncident,
    SoftwareLicense, WhistleblowerReport,
};

const DAY: i64 = 86_400;

fn now() -> Timestamp {
    Timestamp::parse("2026-03-15T10:00:00Z").unwrap()
}

fn at(offset_days: i64) -> Timestamp {
    Timestamp::from_epoch_secs(now().epoch_secs() + offset_days * DAY).unwrap()
}

fn open_incident(org: OrganizationId, detected: Timestamp) -> SecurityIncident {
    SecurityIncident::new(org, detected, now()).unwrap()
}

#[test]
fn mixed_snapshot_produces_expected_feed() {
    let org = OrganizationId::new();

    let mut resolved = open_incident(org, at(-100));
    resolved.status = IncidentStatus::Resolved;

    let mut report_due_soon = WhistleblowerReport::without_deadlines(org, at(-10));
    report_due_soon.resolution_due_at = Some(at(2));

    let mut report_resolution_elapsed = WhistleblowerReport::without_deadlines(org, at(-95));
    report_resolution_elapsed.resolution_due_at = Some(at(-1));

    let mut overdue_erasure = ErasureRequest::with_statutory_deadline(org, at(-35));
    overdue_erasure.status = ErasureStatus::Processing;

    let mut executed_erasure = ErasureRequest::with_statutory_deadline(org, at(-35));
    executed_erasure.status = ErasureStatus::Executed;

    let snapshot = Snapshot {
        incidents: vec![open_incident(org, at(-2)), resolved],
        reports: vec![report_due_soon, report_resolution_elapsed],
        erasure_requests: vec![overdue_erasure, executed_erasure],
        licenses: vec![
            SoftwareLicense::new(org, None, 10, 9),
            SoftwareLicense::new(org, Some(at(90)), 10, 1),
        ],
    };

    let feed = aggregate(&snapshot, now());

    // Incidents: the 2-day-old open incident only.
    assert_eq!(feed.counts.security_incidents, 1);
    let incident = &feed.security_incidents[0];
    assert_eq!(incident.days, Some(2));
    assert_eq!(incident.label, AlertLabel::IncidentAge);
    assert_eq!(incident.domain, AlertDomain::SecurityIncidents);

    // Reports: the report due in 2 days qualifies; the one whose
    // resolution deadline elapsed yesterday drops off (non-negative floor
    // on the resolution arm).
    assert_eq!(feed.counts.whistleblower_reports, 1);
    let report = &feed.whistleblower_reports[0];
    assert_eq!(report.days, Some(2));
    assert_eq!(report.label, AlertLabel::Resolution);

    // Erasures: processing + overdue qualifies, executed does not.
    assert_eq!(feed.counts.erasure_requests, 1);
    assert_eq!(feed.erasure_requests[0].days, Some(-5));
    assert_eq!(feed.erasure_requests[0].label, AlertLabel::ResponseOverdue);

    // Licenses: over-utilized qualifies regardless of missing expiry; the
    // far-future license does not.
    assert_eq!(feed.counts.software_licenses, 1);
    assert_eq!(feed.software_licenses[0].label, AlertLabel::OverUtilized);
    assert_eq!(feed.software_licenses[0].days, None);

    assert_eq!(feed.counts.total, 4);
}

#[test]
fn overdue_resolution_with_no_confirmation_is_excluded() {
    let org = OrganizationId::new();
    let mut report = WhistleblowerReport::without_deadlines(org, at(-95));
    report.resolution_due_at = Some(at(-1));
    report.status = ReportStatus::UnderReview;

    let feed = aggregate(
        &Snapshot {
            reports: vec![report],
            ..Snapshot::default()
        },
        now(),
    );
    assert_eq!(feed.counts.whistleblower_reports, 0);
}

#[test]
fn overdue_confirmation_alone_is_included_with_negative_figure() {
    // The confirmation arm, unlike the resolution arm, has no non-negative
    // floor.
    let org = OrganizationId::new();
    let mut report = WhistleblowerReport::without_deadlines(org, at(-20));
    report.confirmation_due_at = Some(at(-4));

    let feed = aggregate(
        &Snapshot {
            reports: vec![report],
            ..Snapshot::default()
        },
        now(),
    );
    assert_eq!(feed.counts.whistleblower_reports, 1);
    assert_eq!(feed.whistleblower_reports[0].days, Some(-4));
    assert_eq!(feed.whistleblower_reports[0].label, AlertLabel::Confirmation);
}

#[test]
fn report_with_both_deadlines_prefers_nearer_nonnegative() {
    let org = OrganizationId::new();
    let mut report = WhistleblowerReport::without_deadlines(org, at(-10));
    report.confirmation_due_at = Some(at(1));
    report.resolution_due_at = Some(at(2));

    let feed = aggregate(
        &Snapshot {
            reports: vec![report],
            ..Snapshot::default()
        },
        now(),
    );
    assert_eq!(feed.whistleblower_reports[0].days, Some(1));
    assert_eq!(feed.whistleblower_reports[0].label, AlertLabel::Confirmation);
}

#[test]
fn feed_round_trips_through_json() {
    let org = OrganizationId::new();
    let snapshot = Snapshot {
        incidents: vec![open_incident(org, at(-3))],
        licenses: vec![SoftwareLicense::new(org, Some(at(-1)), 5, 5)],
        ..Snapshot::default()
    };
    let feed = aggregate(&snapshot, now());

    let json = serde_json::to_string(&feed).unwrap();
    let parsed: skl_alerts::AlertFeed = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, feed);

    // Over-utilized is shadowed by Expired for the same record.
    let license_alert: &Alert = &parsed.software_licenses[0];
    assert_eq!(license_alert.label, AlertLabel::Expired);
}

#[test]
fn snapshot_from_raw_json_aggregates() {
    // Snapshot files are how the CLI feeds the aggregator; missing
    // collections default to empty.
    let raw = r#"{
        "incidents": [],
        "licenses": [{
            "id": "8b2a7f5e-24d1-4f6a-9c3b-1d2e3f4a5b6c",
            "organization_id": "0d9f3c21-7b4e-4a5d-8e6f-a1b2c3d4e5f6",
            "expires_at": "2026-03-20T00:00:00Z",
            "seats_total": 10,
            "seats_used": 2,
            "status": "active"
        }]
    }"#;
    let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
    let feed = aggregate(&snapshot, now());
    assert_eq!(feed.counts.total, 1);
    assert_eq!(feed.software_licenses[0].label, AlertLabel::Expiring);
    assert_eq!(feed.software_licenses[0].days, Some(5));
}
