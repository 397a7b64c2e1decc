//! # Alert Feed API
//!
//! Read-only endpoints over the aggregator:
//!
//! - `GET /v1/alerts` — the full per-domain feed for one organization.
//! - `GET /v1/alerts/counts` — per-domain counts plus the grand total.
//!
//! Both compute the feed fresh from the current store snapshot and the
//! current clock; nothing alert-shaped is persisted.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use metrics::gauge;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use skl_alerts::{aggregate, Alert, AlertFeed};
use skl_core::{OrganizationId, Timestamp};

use crate::auth::{CallerIdentity, OrgScope};
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One entry in the needs-attention feed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertEntry {
    /// Record domain the alert belongs to.
    pub domain: String,
    /// The qualifying record.
    pub record_id: Uuid,
    /// Day figure: an age for incidents, a signed countdown for deadlines.
    /// Absent for over-utilized licenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    /// Which condition produced the alert.
    pub label: String,
}

impl From<&Alert> for AlertEntry {
    fn from(alert: &Alert) -> Self {
        Self {
            domain: alert.domain.as_str().to_string(),
            record_id: *alert.record_id.as_uuid(),
            days: alert.days,
            label: alert.label.as_str().to_string(),
        }
    }
}

/// Per-domain counts plus the grand total.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountsResponse {
    pub security_incidents: usize,
    pub whistleblower_reports: usize,
    pub erasure_requests: usize,
    pub software_licenses: usize,
    pub total: usize,
}

/// The aggregated feed: per-domain alert lists plus counts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub security_incidents: Vec<AlertEntry>,
    pub whistleblower_reports: Vec<AlertEntry>,
    pub erasure_requests: Vec<AlertEntry>,
    pub software_licenses: Vec<AlertEntry>,
    pub counts: CountsResponse,
}

impl From<&AlertFeed> for FeedResponse {
    fn from(feed: &AlertFeed) -> Self {
        let entries = |alerts: &[Alert]| alerts.iter().map(AlertEntry::from).collect();
        Self {
            security_incidents: entries(&feed.security_incidents),
            whistleblower_reports: entries(&feed.whistleblower_reports),
            erasure_requests: entries(&feed.erasure_requests),
            software_licenses: entries(&feed.software_licenses),
            counts: CountsResponse {
                security_incidents: feed.counts.security_incidents,
                whistleblower_reports: feed.counts.whistleblower_reports,
                erasure_requests: feed.counts.erasure_requests,
                software_licenses: feed.counts.software_licenses,
                total: feed.counts.total,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the alerts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/alerts", get(get_feed))
        .route("/v1/alerts/counts", get(get_counts))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Compute the feed for one organization and refresh the alert gauges.
fn compute_feed(state: &AppState, org: OrganizationId) -> AlertFeed {
    let snapshot = state.snapshot(org);
    let feed = aggregate(&snapshot, Timestamp::now());
    for (domain, alerts) in feed.domain_lists() {
        gauge!(
            "skladno_alerts",
            "domain" => domain.as_str(),
            "organization" => org.as_uuid().to_string()
        )
        .set(alerts.len() as f64);
    }
    feed
}

/// GET /v1/alerts — The aggregated needs-attention feed.
#[utoipa::path(
    get,
    path = "/v1/alerts",
    responses(
        (status = 200, description = "Aggregated alert feed", body = FeedResponse),
    ),
    tag = "alerts"
)]
pub(crate) async fn get_feed(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<FeedResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let feed = compute_feed(&state, org);
    Ok(Json(FeedResponse::from(&feed)))
}

/// GET /v1/alerts/counts — Per-domain counts plus the grand total.
#[utoipa::path(
    get,
    path = "/v1/alerts/counts",
    responses(
        (status = 200, description = "Per-domain alert counts", body = CountsResponse),
    ),
    tag = "alerts"
)]
pub(crate) async fn get_counts(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<CountsResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let feed = compute_feed(&state, org);
    Ok(Json(CountsResponse {
        security_incidents: feed.counts.security_incidents,
        whistleblower_reports: feed.counts.whistleblower_reports,
        erasure_requests: feed.counts.erasure_requests,
        software_licenses: feed.counts.software_licenses,
        total: feed.counts.total,
    }))
}
