//! # Erasure Request API
//!
//! CRUD over GDPR Art. 17 erasure requests, scoped to the caller's
//! organization.
//!
//! - `GET    /v1/erasure-requests` — list
//! - `POST   /v1/erasure-requests` — record a request (Dpo+)
//! - `GET    /v1/erasure-requests/{id}` — get
//! - `PUT    /v1/erasure-requests/{id}` — update status (Dpo+)
//! - `DELETE /v1/erasure-requests/{id}` — delete (Admin)
//!
//! Recording with a receipt time applies the statutory 30-day response
//! deadline; an explicit due date overrides it, and omitting both tracks
//! no deadline.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use skl_core::{RecordId, Timestamp};
use skl_records::{ErasureRequest, ErasureStatus};
use skl_store::Table;

use crate::auth::{require_role, CallerIdentity, OrgScope, Role};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to record a data-subject erasure request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateErasureRequest {
    /// When the request was received (ISO8601, UTC with `Z` suffix).
    /// Sets the statutory response deadline 30 days later.
    #[serde(default)]
    pub received_at: Option<String>,
    /// Explicit response due date; overrides the statutory date.
    #[serde(default)]
    pub response_due_at: Option<String>,
}

/// Request to update an erasure request's handling status.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateErasureRequest {
    /// New status: "received", "processing", "executed", or "rejected".
    pub status: String,
}

/// Response representing one erasure request record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErasureResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_due_at: Option<String>,
    pub status: String,
}

impl From<&ErasureRequest> for ErasureResponse {
    fn from(record: &ErasureRequest) -> Self {
        Self {
            id: *record.id.as_uuid(),
            organization_id: *record.organization_id.as_uuid(),
            response_due_at: record.response_due_at.map(|t| t.to_iso8601()),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Erasure request list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErasureListResponse {
    pub erasure_requests: Vec<ErasureResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the erasure requests router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/erasure-requests",
            get(list_erasures).post(create_erasure),
        )
        .route(
            "/v1/erasure-requests/{id}",
            get(get_erasure).put(update_erasure).delete(delete_erasure),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/erasure-requests — List the organization's erasure requests.
#[utoipa::path(
    get,
    path = "/v1/erasure-requests",
    responses(
        (status = 200, description = "List of erasure requests", body = ErasureListResponse),
    ),
    tag = "erasure-requests"
)]
pub(crate) async fn list_erasures(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
) -> Result<Json<ErasureListResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let records = state.erasure_requests(org);
    Ok(Json(ErasureListResponse {
        total: records.len(),
        erasure_requests: records.iter().map(ErasureResponse::from).collect(),
    }))
}

/// POST /v1/erasure-requests — Record a new erasure request.
#[utoipa::path(
    post,
    path = "/v1/erasure-requests",
    request_body = CreateErasureRequest,
    responses(
        (status = 201, description = "Erasure request recorded", body = ErasureResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "erasure-requests"
)]
pub(crate) async fn create_erasure(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    body: Result<Json<CreateErasureRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ErasureResponse>), AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let mut record = match req.received_at {
        Some(ref s) => ErasureRequest::with_statutory_deadline(org, Timestamp::parse(s)?),
        None => ErasureRequest {
            id: RecordId::new(),
            organization_id: org,
            response_due_at: None,
            status: ErasureStatus::Received,
        },
    };
    if let Some(ref s) = req.response_due_at {
        record.response_due_at = Some(Timestamp::parse(s)?);
    }

    state.store.upsert_erasure_request(record.clone());
    state.persist_erasure(&record).await?;
    state.record_changed(Table::ErasureRequests, org);

    Ok((StatusCode::CREATED, Json(ErasureResponse::from(&record))))
}

/// GET /v1/erasure-requests/{id} — Get one erasure request.
#[utoipa::path(
    get,
    path = "/v1/erasure-requests/{id}",
    params(("id" = Uuid, Path, description = "Erasure request UUID")),
    responses(
        (status = 200, description = "Erasure request details", body = ErasureResponse),
        (status = 404, description = "Erasure request not found", body = crate::error::ErrorBody),
    ),
    tag = "erasure-requests"
)]
pub(crate) async fn get_erasure(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<Json<ErasureResponse>, AppError> {
    let org = scope.resolve(&caller)?;
    let record = state
        .store
        .get_erasure_request(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("erasure request {id} not found")))?;
    Ok(Json(ErasureResponse::from(&record)))
}

/// PUT /v1/erasure-requests/{id} — Update the handling status.
#[utoipa::path(
    put,
    path = "/v1/erasure-requests/{id}",
    params(("id" = Uuid, Path, description = "Erasure request UUID")),
    request_body = UpdateErasureRequest,
    responses(
        (status = 200, description = "Erasure request updated", body = ErasureResponse),
        (status = 404, description = "Erasure request not found", body = crate::error::ErrorBody),
    ),
    tag = "erasure-requests"
)]
pub(crate) async fn update_erasure(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateErasureRequest>, JsonRejection>,
) -> Result<Json<ErasureResponse>, AppError> {
    require_role(&caller, Role::Dpo)?;
    let org = scope.resolve(&caller)?;
    let req = extract_json(body)?;

    let status: ErasureStatus = req.status.parse()?;
    let mut record = state
        .store
        .get_erasure_request(org, RecordId(id))
        .ok_or_else(|| AppError::NotFound(format!("erasure request {id} not found")))?;
    record.status = status;

    state.store.upsert_erasure_request(record.clone());
    state.persist_erasure(&record).await?;
    state.record_changed(Table::ErasureRequests, org);

    Ok(Json(ErasureResponse::from(&record)))
}

/// DELETE /v1/erasure-requests/{id} — Remove an erasure request.
#[utoipa::path(
    delete,
    path = "/v1/erasure-requests/{id}",
    params(("id" = Uuid, Path, description = "Erasure request UUID")),
    responses(
        (status = 204, description = "Erasure request deleted"),
        (status = 404, description = "Erasure request not found", body = crate::error::ErrorBody),
    ),
    tag = "erasure-requests"
)]
pub(crate) async fn delete_erasure(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(scope): Query<OrgScope>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Admin)?;
    let org = scope.resolve(&caller)?;

    if !state.store.remove_erasure_request(org, RecordId(id)) {
        return Err(AppError::NotFound(format!("erasure request {id} not found")));
    }
    state.persist_erasure_delete(org, RecordId(id)).await?;
    state.record_changed(Table::ErasureRequests, org);

    Ok(StatusCode::NO_CONTENT)
}
