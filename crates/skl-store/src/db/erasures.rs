//! Erasure request persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `erasure_requests` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use skl_core::{OrganizationId, RecordId, Timestamp};
use skl_records::{ErasureRequest, ErasureStatus};

/// Insert or update an erasure request record.
pub async fn upsert(pool: &PgPool, record: &ErasureRequest) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO erasure_requests (id, organization_id, response_due_at, status)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE
         SET response_due_at = EXCLUDED.response_due_at, status = EXCLUDED.status",
    )
    .bind(record.id.0)
    .bind(record.organization_id.0)
    .bind(record.response_due_at.map(|t| *t.as_datetime()))
    .bind(record.status.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an erasure request, scoped to its owning organization.
pub async fn delete(
    pool: &PgPool,
    org: OrganizationId,
    id: RecordId,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM erasure_requests WHERE id = $1 AND organization_id = $2")
            .bind(id.0)
            .bind(org.0)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// List all erasure requests for one organization.
pub async fn list_for_org(
    pool: &PgPool,
    org: OrganizationId,
) -> Result<Vec<ErasureRequest>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ErasureRow>(
        "SELECT id, organization_id, response_due_at, status
         FROM erasure_requests WHERE organization_id = $1 ORDER BY response_due_at",
    )
    .bind(org.0)
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "list_for_org"))
}

/// Load every erasure request into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ErasureRequest>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ErasureRow>(
        "SELECT id, organization_id, response_due_at, status
         FROM erasure_requests ORDER BY response_due_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "load_all"))
}

fn collect(rows: Vec<ErasureRow>, query: &str) -> Vec<ErasureRequest> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.id;
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(query, id = %id, "skipping erasure request row with invalid status");
            }
        }
    }
    records
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ErasureRow {
    id: Uuid,
    organization_id: Uuid,
    response_due_at: Option<DateTime<Utc>>,
    status: String,
}

impl ErasureRow {
    fn into_record(self) -> Option<ErasureRequest> {
        let status: ErasureStatus = self.status.parse().ok()?;
        Some(ErasureRequest {
            id: RecordId(self.id),
            organization_id: OrganizationId(self.organization_id),
            response_due_at: self.response_due_at.map(Timestamp::from_utc),
            status,
        })
    }
}
