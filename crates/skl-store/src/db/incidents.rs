//! Security incident persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `incidents` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use skl_core::{OrganizationId, RecordId};
use skl_records::{IncidentStatus, SecurityIncident};

/// Insert or update an incident record.
pub async fn upsert(pool: &PgPool, record: &SecurityIncident) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO incidents (id, organization_id, detected_at, status)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE
         SET detected_at = EXCLUDED.detected_at, status = EXCLUDED.status",
    )
    .bind(record.id.0)
    .bind(record.organization_id.0)
    .bind(*record.detected_at.as_datetime())
    .bind(record.status.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an incident, scoped to its owning organization.
pub async fn delete(
    pool: &PgPool,
    org: OrganizationId,
    id: RecordId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM incidents WHERE id = $1 AND organization_id = $2")
        .bind(id.0)
        .bind(org.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all incidents for one organization.
pub async fn list_for_org(
    pool: &PgPool,
    org: OrganizationId,
) -> Result<Vec<SecurityIncident>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IncidentRow>(
        "SELECT id, organization_id, detected_at, status
         FROM incidents WHERE organization_id = $1 ORDER BY detected_at",
    )
    .bind(org.0)
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "list_for_org"))
}

/// Load every incident into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SecurityIncident>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IncidentRow>(
        "SELECT id, organization_id, detected_at, status FROM incidents ORDER BY detected_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "load_all"))
}

fn collect(rows: Vec<IncidentRow>, query: &str) -> Vec<SecurityIncident> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.id;
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(query, id = %id, "skipping incident row with invalid status");
            }
        }
    }
    records
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: Uuid,
    organization_id: Uuid,
    detected_at: DateTime<Utc>,
    status: String,
}

impl IncidentRow {
    fn into_record(self) -> Option<SecurityIncident> {
        let status: IncidentStatus = self.status.parse().ok()?;
        Some(SecurityIncident {
            id: RecordId(self.id),
            organization_id: OrganizationId(self.organization_id),
            detected_at: skl_core::Timestamp::from_utc(self.detected_at),
            status,
        })
    }
}
