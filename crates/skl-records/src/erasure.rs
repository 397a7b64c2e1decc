//! # Erasure Request Records
//!
//! GDPR Art. 17 ("right to be forgotten") data-subject requests. Art. 12(3)
//! requires a response within one month of receipt, tracked here as 30 days.
//!
//! Only `Executed` removes a request from the alert feed: a `Rejected`
//! request past its response deadline still needs attention, because the
//! rejection itself must be communicated within the same statutory window.

use serde::{Deserialize, Serialize};

use skl_core::{OrganizationId, RecordId, Timestamp};

/// Days after receipt by which the controller must respond (GDPR Art. 12(3)).
pub const RESPONSE_PERIOD_DAYS: i64 = 30;

/// The handling state of an erasure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErasureStatus {
    /// Request received, not yet assessed.
    Received,
    /// Erasure in progress.
    Processing,
    /// Erasure completed (terminal).
    Executed,
    /// Request refused under an Art. 17(3) exemption (terminal).
    Rejected,
}

impl ErasureStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Rejected)
    }

    /// The snake_case identifier, matching the serde format and the store
    /// column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Processing => "processing",
            Self::Executed => "executed",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ErasureStatus {
    type Err = skl_core::SklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(Self::Received),
            "processing" => Ok(Self::Processing),
            "executed" => Ok(Self::Executed),
            "rejected" => Ok(Self::Rejected),
            other => Err(skl_core::SklError::Validation(format!(
                "unknown erasure status: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for ErasureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "RECEIVED",
            Self::Processing => "PROCESSING",
            Self::Executed => "EXECUTED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// A data-subject erasure request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErasureRequest {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning organization (tenant key).
    pub organization_id: OrganizationId,
    /// When a response is due, if tracked.
    pub response_due_at: Option<Timestamp>,
    /// Current handling status.
    pub status: ErasureStatus,
}

impl ErasureRequest {
    /// Create a request with the statutory response deadline derived from
    /// the receipt time (+30 days).
    pub fn with_statutory_deadline(organization_id: OrganizationId, received_at: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            organization_id,
            response_due_at: Some(received_at.plus_days(RESPONSE_PERIOD_DAYS)),
            status: ErasureStatus::Received,
        }
    }
}
