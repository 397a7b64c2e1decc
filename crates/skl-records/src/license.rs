//! # Software License Register
//!
//! Asset-register entries for purchased software licenses. Three alert
//! conditions apply to active licenses: approaching expiry, already expired,
//! and seat over-utilization at or above 90%.
//!
//! Only `Active` licenses participate in alerting — an expired *status* is a
//! bookkeeping state set by the owner, distinct from an `Active` license
//! whose `expires_at` has passed (which is exactly what the expired alert
//! catches).

use serde::{Deserialize, Serialize};

use skl_core::{OrganizationId, RecordId, Timestamp};

/// Seat-utilization ratio at or above which a license is over-utilized.
pub const OVER_UTILIZATION_THRESHOLD: f64 = 0.90;

/// Days before expiry at which an active license enters the expiring window.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// The register state of a software license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwLicenseStatus {
    /// License is in use.
    Active,
    /// Marked expired by the owner.
    Expired,
    /// Cancelled before expiry.
    Cancelled,
}

impl SwLicenseStatus {
    /// Whether the license participates in alerting.
    pub fn is_alertable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The snake_case identifier, matching the serde format and the store
    /// column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SwLicenseStatus {
    type Err = skl_core::SklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(skl_core::SklError::Validation(format!(
                "unknown license status: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for SwLicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A software license record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareLicense {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning organization (tenant key).
    pub organization_id: OrganizationId,
    /// When the license expires, if it expires at all.
    pub expires_at: Option<Timestamp>,
    /// Total purchased seats.
    pub seats_total: u32,
    /// Seats currently assigned.
    pub seats_used: u32,
    /// Register status.
    pub status: SwLicenseStatus,
}

impl SoftwareLicense {
    /// Create an active license.
    pub fn new(
        organization_id: OrganizationId,
        expires_at: Option<Timestamp>,
        seats_total: u32,
        seats_used: u32,
    ) -> Self {
        Self {
            id: RecordId::new(),
            organization_id,
            expires_at,
            seats_total,
            seats_used,
            status: SwLicenseStatus::Active,
        }
    }

    /// Seat-utilization ratio, or `None` when no seats are tracked.
    ///
    /// `seats_total == 0` means seat counts are not meaningful for this
    /// license (site licenses, perpetual keys) — never a division by zero.
    pub fn utilization(&self) -> Option<f64> {
        if self.seats_total == 0 {
            return None;
        }
        Some(f64::from(self.seats_used) / f64::from(self.seats_total))
    }

    /// Whether utilization is at or above [`OVER_UTILIZATION_THRESHOLD`].
    pub fn is_over_utilized(&self) -> bool {
        self.utilization()
            .is_some_and(|u| u >= OVER_UTILIZATION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_utilization() {
        let lic = SoftwareLicense::new(OrganizationId::new(), None, 10, 9);
        assert_eq!(lic.utilization(), Some(0.9));
        assert!(lic.is_over_utilized());
    }

    #[test]
    fn test_utilization_below_threshold() {
        let lic = SoftwareLicense::new(OrganizationId::new(), None, 10, 8);
        assert!(!lic.is_over_utilized());
    }

    #[test]
    fn test_zero_seats_has_no_utilization() {
        let lic = SoftwareLicense::new(OrganizationId::new(), None, 0, 0);
        assert_eq!(lic.utilization(), None);
        assert!(!lic.is_over_utilized());
    }

    #[test]
    fn test_overcommitted_seats() {
        // seats_used may exceed seats_total (assignment drift); that is
        // trivially over-utilized, not an error.
        let lic = SoftwareLicense::new(OrganizationId::new(), None, 5, 7);
        assert!(lic.is_over_utilized());
    }

    #[test]
    fn test_only_active_is_alertable() {
        assert!(SwLicenseStatus::Active.is_alertable());
        assert!(!SwLicenseStatus::Expired.is_alertable());
        assert!(!SwLicenseStatus::Cancelled.is_alertable());
    }

    #[test]
    fn test_serde_roundtrip() {
        let lic = SoftwareLicense::new(
            OrganizationId::new(),
            Some(ts("2026-12-31T00:00:00Z")),
            25,
            20,
        );
        let json = serde_json::to_string(&lic).unwrap();
        let parsed: SoftwareLicense = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, lic.id);
        assert_eq!(parsed.expires_at, lic.expires_at);
        assert_eq!(parsed.seats_total, 25);
    }
}
