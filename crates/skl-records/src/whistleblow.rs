//! # Whistleblower Report Records
//!
//! Internal reporting-channel records under the Slovenian
//! whistleblower-protection act (ZZPri). Two statutory deadlines apply to
//! each report:
//!
//! - **Confirmation**: the reporter must receive acknowledgement within
//!   7 days of filing.
//! - **Resolution**: the report must be handled within 3 months of filing
//!   (tracked as 90 days).
//!
//! Both due dates are nullable — imported or hand-entered reports may carry
//! neither. The engine never enforces `confirmation_due_at <=
//! resolution_due_at`; the statutory helper produces ordered dates, but
//! hand-entered dates are accepted as-is.

use serde::{Deserialize, Serialize};

use skl_core::{OrganizationId, RecordId, Timestamp};

/// Days after filing by which receipt must be confirmed (ZZPri).
pub const CONFIRMATION_PERIOD_DAYS: i64 = 7;

/// Days after filing by which the report must be resolved (ZZPri, 3 months).
pub const RESOLUTION_PERIOD_DAYS: i64 = 90;

/// The handling state of a whistleblower report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Filed, receipt not yet confirmed.
    Received,
    /// Receipt confirmed, investigation in progress.
    UnderReview,
    /// Handled (terminal).
    Resolved,
}

impl ReportStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// The snake_case identifier, matching the serde format and the store
    /// column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::UnderReview => "under_review",
            Self::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = skl_core::SklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(Self::Received),
            "under_review" => Ok(Self::UnderReview),
            "resolved" => Ok(Self::Resolved),
            other => Err(skl_core::SklError::Validation(format!(
                "unknown report status: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "RECEIVED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Resolved => "RESOLVED",
        };
        f.write_str(s)
    }
}

/// A whistleblower report record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhistleblowerReport {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning organization (tenant key).
    pub organization_id: OrganizationId,
    /// When the report was filed.
    pub filed_at: Timestamp,
    /// When receipt must be confirmed, if tracked.
    pub confirmation_due_at: Option<Timestamp>,
    /// When the report must be resolved, if tracked.
    pub resolution_due_at: Option<Timestamp>,
    /// Current handling status.
    pub status: ReportStatus,
}

impl WhistleblowerReport {
    /// Create a report with both statutory deadlines derived from the
    /// filing time (confirmation +7 days, resolution +90 days).
    pub fn with_statutory_deadlines(organization_id: OrganizationId, filed_at: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            organization_id,
            filed_at,
            confirmation_due_at: Some(filed_at.plus_days(CONFIRMATION_PERIOD_DAYS)),
            resolution_due_at: Some(filed_at.plus_days(RESOLUTION_PERIOD_DAYS)),
            status: ReportStatus::Received,
        }
    }

    /// Create a report without tracked deadlines (imported data).
    pub fn without_deadlines(organization_id: OrganizationId, filed_at: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            organization_id,
            filed_at,
            confirmation_due_at: None,
            resolution_due_at: None,
            status: ReportStatus::Received,
        }
    }
}
