//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skladno API — Compliance Registers and Alert Feed",
        version = "0.1.0",
        description = "Axum API for the Skladno compliance stack: security incidents, whistleblower reports, erasure requests, software licenses, and the aggregated needs-attention alert feed.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Alerts
        crate::routes::alerts::get_feed,
        crate::routes::alerts::get_counts,
        // Incidents
        crate::routes::incidents::list_incidents,
        crate::routes::incidents::create_incident,
        crate::routes::incidents::get_incident,
        crate::routes::incidents::update_incident,
        crate::routes::incidents::delete_incident,
        // Reports
        crate::routes::reports::list_reports,
        crate::routes::reports::create_report,
        crate::routes::reports::get_report,
        crate::routes::reports::update_report,
        crate::routes::reports::delete_report,
        // Erasure requests
        crate::routes::erasures::list_erasures,
        crate::routes::erasures::create_erasure,
        crate::routes::erasures::get_erasure,
        crate::routes::erasures::update_erasure,
        crate::routes::erasures::delete_erasure,
        // Licenses
        crate::routes::licenses::list_licenses,
        crate::routes::licenses::create_license,
        crate::routes::licenses::get_license,
        crate::routes::licenses::update_license,
        crate::routes::licenses::delete_license,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Alert DTOs
        crate::routes::alerts::AlertEntry,
        crate::routes::alerts::CountsResponse,
        crate::routes::alerts::FeedResponse,
        // Incident DTOs
        crate::routes::incidents::CreateIncidentRequest,
        crate::routes::incidents::UpdateIncidentRequest,
        crate::routes::incidents::IncidentResponse,
        crate::routes::incidents::IncidentListResponse,
        // Report DTOs
        crate::routes::reports::CreateReportRequest,
        crate::routes::reports::UpdateReportRequest,
        crate::routes::reports::ReportResponse,
        crate::routes::reports::ReportListResponse,
        // Erasure DTOs
        crate::routes::erasures::CreateErasureRequest,
        crate::routes::erasures::UpdateErasureRequest,
        crate::routes::erasures::ErasureResponse,
        crate::routes::erasures::ErasureListResponse,
        // License DTOs
        crate::routes::licenses::CreateLicenseRequest,
        crate::routes::licenses::UpdateLicenseRequest,
        crate::routes::licenses::LicenseResponse,
        crate::routes::licenses::LicenseListResponse,
    )),
    tags(
        (name = "alerts", description = "Aggregated needs-attention feed"),
        (name = "incidents", description = "Security incident register (NIS2)"),
        (name = "reports", description = "Whistleblower reporting channel (ZZPri)"),
        (name = "erasure-requests", description = "GDPR Art. 17 erasure requests"),
        (name = "licenses", description = "Software license register"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
