//! # Software License API
//!
//! CRUD over the software license register, scoped to the caller's
//! organization.
//!
//! - `GET    /v1/licenses` — list
//! - `POST   /v1/licenses` — register a license (Dpo+)
//! - `GET    /v1/licenses/{id}` — get
//! - `PUT    /v1/licenses/{id}` — update (Dpo+)
//! - `DELETE /v1/licenses/{id}` — delete (Admin)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use skl_core::{RecordId, Timestamp};
use skl_records::{SoftwareLicense, SwLicenseStatus};
use skl_store::Table;

use crate::auth::{require_role, CallerIdentity, OrgScope, Role};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to register a software license.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLicenseRequest {
    /// When the license expires (ISO8601, UTC with `Z` suffix), if it
    /// expires at all.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Total purchased seats. Zero means seat counts are not tracked.
    pub seats_total: u32,
    /// Seats currently assigned.
    pub seats_used: u32,
}

/// Request to update a license record. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLicenseRequest {
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub seats_total: Option<u32>,
    #[serde(default)]
    pub seats_used: Option<u32>,
    /// New status: "active", "expired", or "cancelled".
    #[serde(default)]
    pub status: Option<String>,
}

/// Response representing one license record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LicenseResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub seats_total: u32,
    pub seats_used: u32,
    /// Seat-utilization ratio; absent when seat counts are not tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    pub status: String,
}

impl From<&SoftwareLicense> for LicenseResponse {
    fn from(record: &SoftwareLicense) -> Self {
        Self {
            id: *record.id.as_uuid(),
            organization_id: *record.organization_id.as_uuid(),
            expires_at: record.expires_at.map(|t| t.to_iso8601()),
            seats_total: record.seats_total,
            seats_used: record.seats_used,
            utilization: record.utilization(),
            status: record.status.as_str().to_string(),
        }
    }
}

/// License list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LicenseListResponse {
    pub licenses: Vec<LicenseResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the licenses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/licenses", get(list_licenses).post(create_license))
        .route(
            "/v1/licenses/{id}",
            get(get_license).put(update_license).delete(delete_license),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/licenses — List the organization's licenses.
#[utoipa::path(
    get,
    path = "/v1/licenses",
    responses(
        (status = 200, description = "List of licenses", body = LicenseListResponse),
    ),
    tag = "licenses"
)]
pub(crate) async fn list_licenses(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<LicenseListResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let records = state.licenses(org);
    Ok(Json(LicenseListResponse {
        total: records.len(),
        licenses: records.iter().map(LicenseResponse::from).collect(),
    }))
}

/// POST /v1/licenses — Register a new license.
#[utoipa::path(
    post,
    path = "/v1/licenses",
    request_body = CreateLicenseRequest,
    responses(
        (status = 201, description = "License registered", body = LicenseResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub(crate) async fn create_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    body: Result<Json<CreateLicenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LicenseResponse>), AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let expires_at = match req.expires_at {
        Some(ref s) => Some(Timestamp::parse(s)?),
        None => None,
    };
    let record = SoftwareLicense::new(org, expires_at, req.seats_total, req.seats_used);

    state.store.upsert_license(record.clone());
    state.persist_license(&record).await?;
    state.record_changed(Table::Licenses, org);

    Ok((StatusCode::CREATED, Json(LicenseResponse::from(&record))))
}

/// GET /v1/licenses/{id} — Get one license.
#[utoipa::path(
    get,
    path = "/v1/licenses/{id}",
    params(("id" = Uuid, Path, description = "License UUID")),
    responses(
        (status = 200, description = "License details", body = LicenseResponse),
        (status = 404, description = "License not found", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub(crate) async fn get_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<Json<LicenseResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let record = state
        .store
        .get_license(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("license {id} not found")))?;
    Ok(Json(LicenseResponse::from(&record)))
}

/// PUT /v1/licenses/{id} — Update a license record.
#[utoipa::path(
    put,
    path = "/v1/licenses/{id}",
    params(("id" = Uuid, Path, description = "License UUID")),
    request_body = UpdateLicenseRequest,
    responses(
        (status = 200, description = "License updated", body = LicenseResponse),
        (status = 404, description = "License not found", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub(crate) async fn update_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateLicenseRequest>, JsonRejection>,
) -> Result<Json<LicenseResponse>, AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let mut record = state
        .store
        .get_license(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("license {id} not found")))?;

    if let Some(ref s) = req.expires_at {
        record.expires_at = Some(Timestamp::parse(s)?);
    }
    if let Some(seats) = req.seats_total {
        record.seats_total = seats;
    }
    if let Some(seats) = req.seats_used {
        record.seats_used = seats;
    }
    if let Some(ref s) = req.status {
        record.status = s.parse::<SwLicenseStatus>()?;
    }

    state.store.upsert_license(record.clone());
    state.persist_license(&record).await?;
    state.record_changed(Table::Licenses, org);

    Ok(Json(LicenseResponse::from(&record)))
}

/// DELETE /v1/licenses/{id} — Remove a license.
#[utoipa::path(
    delete,
    path = "/v1/licenses/{id}",
    params(("id" = Uuid, Path, description = "License UUID")),
    responses(
        (status = 204, description = "License deleted"),
        (status = 404, description = "License not found", body = crate::error::ErrorBody),
    ),
    tag = "licenses"
)]
pub(crate) async fn delete_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Admin)?;
    let org = scope.resolve(&caller)?;

    if !state.store.remove_license(org, RecordId(id)) {
        return Err(AppError::NotFound(format!("license {id} not found")));
    }
    state.persist_license_delete(org, RecordId(id)).await?;
    state.record_changed(Table::Licenses, org);

    Ok(StatusCode::NO_CONTENT)
}
