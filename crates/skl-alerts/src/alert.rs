//! # Alert Feed Types
//!
//! The output contract of the aggregator: one [`Alert`] per qualifying
//! record, grouped per domain, plus [`DomainCounts`].

use serde::{Deserialize, Serialize};

use skl_core::{AlertDomain, RecordId};

/// Which deadline or condition produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLabel {
    /// Unresolved incident past the age threshold; the day figure is its
    /// age.
    IncidentAge,
    /// Whistleblower confirmation deadline; the day figure is the
    /// countdown (may be negative).
    Confirmation,
    /// Whistleblower resolution deadline; the day figure is the
    /// non-negative countdown.
    Resolution,
    /// Erasure response deadline has passed; the day figure is the
    /// (negative) countdown.
    ResponseOverdue,
    /// Active license inside the expiry warning window; the day figure is
    /// the countdown.
    Expiring,
    /// Active license whose expiry has passed; the day figure is the
    /// (negative) countdown.
    Expired,
    /// Active license at or above the seat-utilization threshold; no day
    /// figure applies.
    OverUtilized,
}

impl AlertLabel {
    /// Returns the snake_case string identifier for this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncidentAge => "incident_age",
            Self::Confirmation => "confirmation",
            Self::Resolution => "resolution",
            Self::ResponseOverdue => "response_overdue",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
            Self::OverUtilized => "over_utilized",
        }
    }
}

impl std::fmt::Display for AlertLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the needs-attention feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// The record domain this alert belongs to.
    pub domain: AlertDomain,
    /// The qualifying record.
    pub record_id: RecordId,
    /// The day figure backing the alert: an age for incidents, a signed
    /// countdown for deadlines. `None` only for over-utilized licenses,
    /// where no day figure exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    /// Which condition produced the alert.
    pub label: AlertLabel,
}

/// Per-domain counts plus the grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCounts {
    /// Security incidents needing attention.
    pub security_incidents: usize,
    /// Whistleblower reports needing attention.
    pub whistleblower_reports: usize,
    /// Erasure requests needing attention.
    pub erasure_requests: usize,
    /// Software licenses needing attention.
    pub software_licenses: usize,
    /// Sum of all per-domain counts.
    pub total: usize,
}

/// The aggregated feed: per-domain alert lists, each sorted ascending by
/// day figure (entries without a figure last), plus counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFeed {
    /// Security incident alerts.
    pub security_incidents: Vec<Alert>,
    /// Whistleblower report alerts.
    pub whistleblower_reports: Vec<Alert>,
    /// Erasure request alerts.
    pub erasure_requests: Vec<Alert>,
    /// Software license alerts.
    pub software_licenses: Vec<Alert>,
    /// Per-domain counts and grand total.
    pub counts: DomainCounts,
}

impl AlertFeed {
    /// The four per-domain lists in canonical feed order.
    pub fn domain_lists(&self) -> [(AlertDomain, &[Alert]); 4] {
        [
            (AlertDomain::SecurityIncidents, &self.security_incidents),
            (
                AlertDomain::WhistleblowerReports,
                &self.whistleblower_reports,
            ),
            (AlertDomain::ErasureRequests, &self.erasure_requests),
            (AlertDomain::SoftwareLicenses, &self.software_licenses),
        ]
    }
}
