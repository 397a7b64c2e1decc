//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! - **MemoryStore** — the store handlers serve from, always present.
//! - **PgPool** — optional write-through persistence; present only when
//!   `DATABASE_URL` is configured. The memory store is hydrated from it at
//!   startup.
//! - **SnapshotCache** — per-`(table, organization)` read cache in front of
//!   the store; invalidated on every write through [`AppState::record_changed`].
//! - **ChangeNotifier** — broadcasts table-change events so other consumers
//!   (background tasks, future realtime transports) can invalidate too.

use std::sync::Arc;

use sqlx::PgPool;

use skl_alerts::Snapshot;
use skl_core::OrganizationId;
use skl_records::{ErasureRequest, SecurityIncident, SoftwareLicense, WhistleblowerReport};
use skl_store::cache::TableRows;
use skl_store::{db, ChangeEvent, ChangeNotifier, MemoryStore, SnapshotCache, Table};

use crate::error::AppError;

/// Application configuration, read from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Shared bearer-token secret. `None` disables authentication.
    pub auth_token: Option<String>,
    /// Whether the `/metrics` endpoint is mounted.
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Build configuration from `PORT`, `SKLADNO_AUTH_TOKEN`, and
    /// `SKLADNO_METRICS_ENABLED`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let auth_token = std::env::var("SKLADNO_AUTH_TOKEN").ok();
        let metrics_enabled = std::env::var("SKLADNO_METRICS_ENABLED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        Self {
            port,
            auth_token,
            metrics_enabled,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            metrics_enabled: true,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<SnapshotCache>,
    pub notifier: ChangeNotifier,
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Create application state with an empty store.
    pub fn new(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
            cache: Arc::new(SnapshotCache::new()),
            notifier: ChangeNotifier::default(),
            db_pool,
        }
    }

    /// Load the full contents of all four tables from the database into the
    /// memory store. No-op without a configured pool.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };
        let incidents = db::incidents::load_all(pool).await?;
        let reports = db::reports::load_all(pool).await?;
        let erasures = db::erasures::load_all(pool).await?;
        let licenses = db::licenses::load_all(pool).await?;
        tracing::info!(
            incidents = incidents.len(),
            reports = reports.len(),
            erasure_requests = erasures.len(),
            licenses = licenses.len(),
            "hydrated record store from database"
        );
        self.store
            .replace_all(incidents, reports, erasures, licenses);
        Ok(())
    }

    /// Record that a table changed for an organization: drops the cache
    /// entry and publishes a change event.
    pub fn record_changed(&self, table: Table, organization_id: OrganizationId) {
        self.cache.invalidate(table, organization_id);
        self.notifier.notify(ChangeEvent {
            table,
            organization_id,
        });
    }

    /// Incidents for one organization, served from the cache when present.
    pub fn incidents(&self, org: OrganizationId) -> Vec<SecurityIncident> {
        if let Some(TableRows::Incidents(rows)) = self.cache.get(Table::Incidents, org) {
            return rows;
        }
        let rows = self.store.list_incidents(org);
        self.cache.put(org, TableRows::Incidents(rows.clone()));
        rows
    }

    /// Reports for one organization, served from the cache when present.
    pub fn reports(&self, org: OrganizationId) -> Vec<WhistleblowerReport> {
        if let Some(TableRows::Reports(rows)) = self.cache.get(Table::Reports, org) {
            return rows;
        }
        let rows = self.store.list_reports(org);
        self.cache.put(org, TableRows::Reports(rows.clone()));
        rows
    }

    /// Erasure requests for one organization, served from the cache when
    /// present.
    pub fn erasure_requests(&self, org: OrganizationId) -> Vec<ErasureRequest> {
        if let Some(TableRows::ErasureRequests(rows)) = self.cache.get(Table::ErasureRequests, org)
        {
            return rows;
        }
        let rows = self.store.list_erasure_requests(org);
        self.cache.put(org, TableRows::ErasureRequests(rows.clone()));
        rows
    }

    /// Licenses for one organization, served from the cache when present.
    pub fn licenses(&self, org: OrganizationId) -> Vec<SoftwareLicense> {
        if let Some(TableRows::Licenses(rows)) = self.cache.get(Table::Licenses, org) {
            return rows;
        }
        let rows = self.store.list_licenses(org);
        self.cache.put(org, TableRows::Licenses(rows.clone()));
        rows
    }

    /// Snapshot of all four tables for one organization — the aggregator's
    /// input.
    pub fn snapshot(&self, org: OrganizationId) -> Snapshot {
        Snapshot {
            incidents: self.incidents(org),
            reports: self.reports(org),
            erasure_requests: self.erasure_requests(org),
            licenses: self.licenses(org),
        }
    }

    // ── Write-through persistence ──────────────────────────────────────

    /// Mirror an incident write to the database, if one is configured.
    pub async fn persist_incident(&self, record: &SecurityIncident) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::incidents::upsert(pool, record).await?;
        }
        Ok(())
    }

    /// Mirror an incident deletion to the database, if one is configured.
    pub async fn persist_incident_delete(
        &self,
        org: OrganizationId,
        id: skl_core::RecordId,
    ) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::incidents::delete(pool, org, id).await?;
        }
        Ok(())
    }

    /// Mirror a report write to the database, if one is configured.
    pub async fn persist_report(&self, record: &WhistleblowerReport) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::reports::upsert(pool, record).await?;
        }
        Ok(())
    }

    /// Mirror a report deletion to the database, if one is configured.
    pub async fn persist_report_delete(
        &self,
        org: OrganizationId,
        id: skl_core::RecordId,
    ) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::reports::delete(pool, org, id).await?;
        }
        Ok(())
    }

    /// Mirror an erasure request write to the database, if one is configured.
    pub async fn persist_erasure(&self, record: &ErasureRequest) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::erasures::upsert(pool, record).await?;
        }
        Ok(())
    }

    /// Mirror an erasure request deletion to the database, if one is
    /// configured.
    pub async fn persist_erasure_delete(
        &self,
        org: OrganizationId,
        id: skl_core::RecordId,
    ) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::erasures::delete(pool, org, id).await?;
        }
        Ok(())
    }

    /// Mirror a license write to the database, if one is configured.
    pub async fn persist_license(&self, record: &SoftwareLicense) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::licenses::upsert(pool, record).await?;
        }
        Ok(())
    }

    /// Mirror a license deletion to the database, if one is configured.
    pub async fn persist_license_delete(
        &self,
        org: OrganizationId,
        id: skl_core::RecordId,
    ) -> Result<(), AppError> {
        if let Some(pool) = &self.db_pool {
            db::licenses::delete(pool, org, id).await?;
        }
        Ok(())
    }
}
