//! Software license persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `licenses` table.
//! Seat counts are stored as Postgres `INTEGER`; values outside the i32
//! range are saturated on write and clamped to zero on read.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use skl_core::{OrganizationId, RecordId, Timestamp};
use skl_records::{SoftwareLicense, SwLicenseStatus};

/// Insert or update a license record.
pub async fn upsert(pool: &PgPool, record: &SoftwareLicense) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO licenses (id, organization_id, expires_at, seats_total, seats_used, status)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE
         SET expires_at = EXCLUDED.expires_at,
             seats_total = EXCLUDED.seats_total,
             seats_used = EXCLUDED.seats_used,
             status = EXCLUDED.status",
    )
    .bind(record.id.0)
    .bind(record.organization_id.0)
    .bind(record.expires_at.map(|t| *t.as_datetime()))
    .bind(i32::try_from(record.seats_total).unwrap_or(i32::MAX))
    .bind(i32::try_from(record.seats_used).unwrap_or(i32::MAX))
    .bind(record.status.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a license, scoped to its owning organization.
pub async fn delete(
    pool: &PgPool,
    org: OrganizationId,
    id: RecordId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM licenses WHERE id = $1 AND organization_id = $2")
        .bind(id.0)
        .bind(org.0)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all licenses for one organization.
pub async fn list_for_org(
    pool: &PgPool,
    org: OrganizationId,
) -> Result<Vec<SoftwareLicense>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LicenseRow>(
        "SELECT id, organization_id, expires_at, seats_total, seats_used, status
         FROM licenses WHERE organization_id = $1 ORDER BY expires_at",
    )
    .bind(org.0)
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "list_for_org"))
}

/// Load every license into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SoftwareLicense>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LicenseRow>(
        "SELECT id, organization_id, expires_at, seats_total, seats_used, status
         FROM licenses ORDER BY expires_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(collect(rows, "load_all"))
}

fn collect(rows: Vec<LicenseRow>, query: &str) -> Vec<SoftwareLicense> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.id;
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(query, id = %id, "skipping license row with invalid status");
            }
        }
    }
    records
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct LicenseRow {
    id: Uuid,
    organization_id: Uuid,
    expires_at: Option<DateTime<Utc>>,
    seats_total: i32,
    seats_used: i32,
    status: String,
}

impl LicenseRow {
    fn into_record(self) -> Option<SoftwareLicense> {
        let status: SwLicenseStatus = self.status.parse().ok()?;
        Some(SoftwareLicense {
            id: RecordId(self.id),
            organization_id: OrganizationId(self.organization_id),
            expires_at: self.expires_at.map(Timestamp::from_utc),
            seats_total: u32::try_from(self.seats_total).unwrap_or(0),
            seats_used: u32::try_from(self.seats_used).unwrap_or(0),
            status,
        })
    }
}
