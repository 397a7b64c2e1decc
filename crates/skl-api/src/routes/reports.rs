//! # Whistleblower Report API
//!
//! CRUD over the internal reporting channel, scoped to the caller's
//! organization.
//!
//! - `GET    /v1/reports` — list
//! - `POST   /v1/reports` — file a report (Dpo+)
//! - `GET    /v1/reports/{id}` — get
//! - `PUT    /v1/reports/{id}` — update status (Dpo+)
//! - `DELETE /v1/reports/{id}` — delete (Admin)
//!
//! Filing applies the statutory deadlines (confirmation +7 days, resolution
//! +90 days) unless explicit due dates are supplied; explicit dates are
//! accepted as-is, including unordered ones.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use skl_core::{RecordId, Timestamp};
use skl_records::{ReportStatus, WhistleblowerReport};
use skl_store::Table;

use crate::auth::{require_role, CallerIdentity, OrgScope, Role};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to file a whistleblower report.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateReportRequest {
    /// When the report was filed (ISO8601, UTC with `Z` suffix).
    pub filed_at: String,
    /// Explicit confirmation due date; overrides the statutory date.
    #[serde(default)]
    pub confirmation_due_at: Option<String>,
    /// Explicit resolution due date; overrides the statutory date.
    #[serde(default)]
    pub resolution_due_at: Option<String>,
    /// Whether to derive the statutory deadlines from the filing time.
    /// Defaults to true; imported records with no tracked deadlines pass
    /// false and no explicit dates.
    #[serde(default = "default_true")]
    pub apply_statutory_deadlines: bool,
}

fn default_true() -> bool {
    true
}

/// Request to update a report's handling status.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateReportRequest {
    /// New status: "received", "under_review", or "resolved".
    pub status: String,
}

/// Response representing one report record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Filing time, ISO8601 UTC.
    pub filed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_due_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_due_at: Option<String>,
    pub status: String,
}

impl From<&WhistleblowerReport> for ReportResponse {
    fn from(record: &WhistleblowerReport) -> Self {
        Self {
            id: *record.id.as_uuid(),
            organization_id: *record.organization_id.as_uuid(),
            filed_at: record.filed_at.to_iso8601(),
            confirmation_due_at: record.confirmation_due_at.map(|t| t.to_iso8601()),
            resolution_due_at: record.resolution_due_at.map(|t| t.to_iso8601()),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Report list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/reports", get(list_reports).post(create_report))
        .route(
            "/v1/reports/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/reports — List the organization's reports.
#[utoipa::path(
    get,
    path = "/v1/reports",
    responses(
        (status = 200, description = "List of reports", body = ReportListResponse),
    ),
    tag = "reports"
)]
pub(crate) async fn list_reports(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<ReportListResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let records = state.reports(org);
    Ok(Json(ReportListResponse {
        total: records.len(),
        reports: records.iter().map(ReportResponse::from).collect(),
    }))
}

/// POST /v1/reports — File a new report.
#[utoipa::path(
    post,
    path = "/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report filed", body = ReportResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub(crate) async fn create_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    body: Result<Json<CreateReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReportResponse>), AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let filed_at = Timestamp::parse(&req.filed_at)?;
    let mut record = if req.apply_statutory_deadlines {
        WhistleblowerReport::with_statutory_deadlines(org, filed_at)
    } else {
        WhistleblowerReport::without_deadlines(org, filed_at)
    };
    if let Some(ref s) = req.confirmation_due_at {
        record.confirmation_due_at = Some(Timestamp::parse(s)?);
    }
    if let Some(ref s) = req.resolution_due_at {
        record.resolution_due_at = Some(Timestamp::parse(s)?);
    }

    state.store.upsert_report(record.clone());
    state.persist_report(&record).await?;
    state.record_changed(Table::Reports, org);

    Ok((StatusCode::CREATED, Json(ReportResponse::from(&record))))
}

/// GET /v1/reports/{id} — Get one report.
#[utoipa::path(
    get,
    path = "/v1/reports/{id}",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report details", body = ReportResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub(crate) async fn get_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let record = state
        .store
        .get_report(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("report {id} not found")))?;
    Ok(Json(ReportResponse::from(&record)))
}

/// PUT /v1/reports/{id} — Update the handling status.
#[utoipa::path(
    put,
    path = "/v1/reports/{id}",
    params(("id" = Uuid, Path, description = "Report UUID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report updated", body = ReportResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub(crate) async fn update_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let status: ReportStatus = req.status.parse()?;
    let mut record = state
        .store
        .get_report(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("report {id} not found")))?;
    record.status = status;

    state.store.upsert_report(record.clone());
    state.persist_report(&record).await?;
    state.record_changed(Table::Reports, org);

    Ok(Json(ReportResponse::from(&record)))
}

/// DELETE /v1/reports/{id} — Remove a report.
#[utoipa::path(
    delete,
    path = "/v1/reports/{id}",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub(crate) async fn delete_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Admin)?;
    let org = scope.resolve(&caller)?;

    if !state.store.remove_report(org, RecordId(id)) {
        return Err(AppError::NotFound(format!("report {id} not found")));
    }
    state.persist_report_delete(org, RecordId(id)).await?;
    state.record_changed(Table::Reports, org);

    Ok(StatusCode::NO_CONTENT)
}
