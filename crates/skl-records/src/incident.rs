//! # Security Incident Register
//!
//! NIS2 / ISO 27001 incident records. The alert rule for this domain is
//! age-based: an unresolved incident older than one full day needs
//! attention.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skl_core::{OrganizationId, RecordId, Timestamp};

/// The handling state of a security incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Reported, not yet triaged.
    Open,
    /// Under active investigation.
    Investigating,
    /// Contained, remediation pending.
    Contained,
    /// Closed (terminal).
    Resolved,
}

impl IncidentStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// The snake_case identifier, matching the serde format and the store
    /// column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Investigating => "investigating",
            Self::Contained => "contained",
            Self::Resolved => "resolved",
        }
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = skl_core::SklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "investigating" => Ok(Self::Investigating),
            "contained" => Ok(Self::Contained),
            "resolved" => Ok(Self::Resolved),
            other => Err(skl_core::SklError::Validation(format!(
                "unknown incident status: {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::Investigating => "INVESTIGATING",
            Self::Contained => "CONTAINED",
            Self::Resolved => "RESOLVED",
        };
        f.write_str(s)
    }
}

/// Errors raised by incident boundary validation.
#[derive(Error, Debug)]
pub enum IncidentError {
    /// Detection time is in the future of the creation clock.
    #[error("detected_at {detected_at} is after now {now}")]
    DetectedInFuture {
        /// The offending detection timestamp.
        detected_at: Timestamp,
        /// The clock at creation time.
        now: Timestamp,
    },
}

/// A security incident record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIncident {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning organization (tenant key).
    pub organization_id: OrganizationId,
    /// When the incident was detected. Never in the future at creation.
    pub detected_at: Timestamp,
    /// Current handling status.
    pub status: IncidentStatus,
}

impl SecurityIncident {
    /// Create a new incident, enforcing `detected_at <= now`.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError::DetectedInFuture`] when the detection time
    /// lies after `now`.
    pub fn new(
        organization_id: OrganizationId,
        detected_at: Timestamp,
        now: Timestamp,
    ) -> Result<Self, IncidentError> {
        if detected_at > now {
            return Err(IncidentError::DetectedInFuture { detected_at, now });
        }
        Ok(Self {
            id: RecordId::new(),
            organization_id,
            detected_at,
            status: IncidentStatus::Open,
        })
    }
}
