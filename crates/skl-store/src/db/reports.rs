//! Whistleblower report persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `reports` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use skl_core::{OrganizationId, RecordId, Timestamp};
use skl_records::{ReportStatus, WhistleblowerReport};

/// Insert or update a report record.
pub async fn upsert(pool: &PgPool, record: &WhistleblowerReport) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO reports (id, organization_id, filed_at, confirmation_due_at,
         resolution_due_at, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE
         SET filed_at = EXCLUDED.filed_at,
             confirmation_due_at = EXCLUDED.confirmation_due_at,
             resolution_due_at = EXCLUDED.resolution_due_at,
             status = EXCLUDED.status",
    )
    .bind(record.id.0)
    .bind(record.organization_id.0)
    .bind(*record.filed_at.as_datetime())
    .bind(record.confirmation_due_at.map(|t| *t.as_datetime()))
    .bind(record.resolution_due_at.map(|t| *t.as_datetime()))
    .bind(record.status.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a report, scoped to its owning organization.
pub async fn delete(
    pool: &PgPool,
    org: OrganizationId,
    id: RecordId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND organization_id = $2")
        .bind(id.0)
        .bind(org.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all reports for one organization.
pub async fn list_for_org(
    pool: &PgPool,
    org: OrganizationId,
) -> Result<Vec<WhistleblowerReport>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReportRow>(
        "SELECT id, organization_id, filed_at, confirmation_due_at, resolution_due_at, status
         FROM reports WHERE organization_id = $1 ORDER BY filed_at",
    )
    .bind(org.0)
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "list_for_org"))
}

/// Load every report into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<WhistleblowerReport>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReportRow>(
        "SELECT id, organization_id, filed_at, confirmation_due_at, resolution_due_at, status
         FROM reports ORDER BY filed_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "load_all"))
}

fn collect(rows: Vec<ReportRow>, query: &str) -> Vec<WhistleblowerReport> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.id;
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(query, id = %id, "skipping report row with invalid status");
            }
        }
    }
    records
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    organization_id: Uuid,
    filed_at: DateTime<Utc>,
    confirmation_due_at: Option<DateTime<Utc>>,
    resolution_due_at: Option<DateTime<Utc>>,
    status: String,
}

impl ReportRow {
    fn into_record(self) -> Option<WhistleblowerReport> {
        let status: ReportStatus = self.status.parse().ok()?;
        Some(WhistleblowerReport {
            id: RecordId(self.id),
            organization_id: OrganizationId(self.organization_id),
            filed_at: Timestamp::from_utc(self.filed_at),
            confirmation_due_at: self.confirmation_due_at.map(Timestamp::from_utc),
            resolution_due_at: self.resolution_due_at.map(Timestamp::from_utc),
            status,
        })
    }
}
