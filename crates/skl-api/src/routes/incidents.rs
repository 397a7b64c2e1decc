//! # Security Incident API
//!
//! CRUD over the incident register, scoped to the caller's organization.
//!
//! - `GET    /v1/incidents` — list
//! - `POST   /v1/incidents` — create (Dpo+)
//! - `GET    /v1/incidents/{id}` — get
//! - `PUT    /v1/incidents/{id}` — update status (Dpo+)
//! - `DELETE /v1/incidents/{id}` — delete (Admin)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use skl_core::{RecordId, Timestamp};
use skl_records::{IncidentStatus, SecurityIncident};
use skl_store::Table;

use crate::auth::{require_role, CallerIdentity, OrgScope, Role};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to register a security incident.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateIncidentRequest {
    /// When the incident was detected (ISO8601, UTC with `Z` suffix).
    /// Must not lie in the future.
    pub detected_at: String,
}

/// Request to update an incident's handling status.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateIncidentRequest {
    /// New status: "open", "investigating", "contained", or "resolved".
    pub status: String,
}

/// Response representing one incident record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Detection time, ISO8601 UTC.
    pub detected_at: String,
    pub status: String,
}

impl From<&SecurityIncident> for IncidentResponse {
    fn from(record: &SecurityIncident) -> Self {
        Self {
            id: *record.id.as_uuid(),
            organization_id: *record.organization_id.as_uuid(),
            detected_at: record.detected_at.to_iso8601(),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Incident list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncidentListResponse {
    pub incidents: Vec<IncidentResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the incidents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/incidents", get(list_incidents).post(create_incident))
        .route(
            "/v1/incidents/{id}",
            get(get_incident)
                .put(update_incident)
                .delete(delete_incident),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/incidents — List the organization's incidents.
#[utoipa::path(
    get,
    path = "/v1/incidents",
    responses(
        (status = 200, description = "List of incidents", body = IncidentListResponse),
    ),
    tag = "incidents"
)]
pub(crate) async fn list_incidents(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<IncidentListResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let records = state.incidents(org);
    Ok(Json(IncidentListResponse {
        total: records.len(),
        incidents: records.iter().map(IncidentResponse::from).collect(),
    }))
}

/// POST /v1/incidents — Register a new incident.
#[utoipa::path(
    post,
    path = "/v1/incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident registered", body = IncidentResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "incidents"
)]
pub(crate) async fn create_incident(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    body: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IncidentResponse>), AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let detected_at = Timestamp::parse(&req.detected_at)?;
    let record = SecurityIncident::new(org, detected_at, Timestamp::now())?;

    state.store.upsert_incident(record.clone());
    state.persist_incident(&record).await?;
    state.record_changed(Table::Incidents, org);

    Ok((StatusCode::CREATED, Json(IncidentResponse::from(&record))))
}

/// GET /v1/incidents/{id} — Get one incident.
#[utoipa::path(
    get,
    path = "/v1/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident UUID")),
    responses(
        (status = 200, description = "Incident details", body = IncidentResponse),
        (status = 404, description = "Incident not found", body = crate::error::ErrorBody),
    ),
    tag = "incidents"
)]
pub(crate) async fn get_incident(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<Json<IncidentResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let record = state
        .store
        .get_incident(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("incident {id} not found")))?;
    Ok(Json(IncidentResponse::from(&record)))
}

/// PUT /v1/incidents/{id} — Update the handling status.
#[utoipa::path(
    put,
    path = "/v1/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident UUID")),
    request_body = UpdateIncidentRequest,
    responses(
        (status = 200, description = "Incident updated", body = IncidentResponse),
        (status = 404, description = "Incident not found", body = crate::error::ErrorBody),
    ),
    tag = "incidents"
)]
pub(crate) async fn update_incident(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateIncidentRequest>, JsonRejection>,
) -> Result<Json<IncidentResponse>, AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let status: IncidentStatus = req.status.parse()?;
    let mut record = state
        .store
        .get_incident(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("incident {id} not found")))?;
    record.status = status;

    state.store.upsert_incident(record.clone());
    state.persist_incident(&record).await?;
    state.record_changed(Table::Incidents, org);

    Ok(Json(IncidentResponse::from(&record)))
}

/// DELETE /v1/incidents/{id} — Remove an incident.
#[utoipa::path(
    delete,
    path = "/v1/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident UUID")),
    responses(
        (status = 204, description = "Incident deleted"),
        (status = 404, description = "Incident not found", body = crate::error::ErrorBody),
    ),
    tag = "incidents"
)]
pub(crate) async fn delete_incident(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Admin)?;
    let org = scope.resolve(&caller)?;

    if !state.store.remove_incident(org, RecordId(id)) {
        return Err(AppError::NotFound(format!("incident {id} not found")));
    }
    state.persist_incident_delete(org, RecordId(id)).await?;
    state.record_changed(Table::Incidents, org);

    Ok(StatusCode::NO_CONTENT)
}
