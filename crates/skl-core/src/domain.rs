//! # Alert Domain — Single Source of Truth
//!
//! Defines the `AlertDomain` enum with the four regulatory record domains
//! that feed the alert aggregator. This is the ONE definition used across
//! the stack. Every `match` on `AlertDomain` must be exhaustive — adding a
//! record domain forces every consumer to handle it at compile time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SklError;

/// The regulatory record domains aggregated into the alert feed.
///
/// Each domain is one managed record category with its own inclusion rule
/// and deadline semantics. A record contributes to at most one domain's
/// alert list.
///
/// | # | Domain | Regulatory basis |
/// |---|--------|------------------|
/// | 1 | SecurityIncidents | NIS2 / ISO 27001 incident handling |
/// | 2 | WhistleblowerReports | ZZPri internal reporting channels |
/// | 3 | ErasureRequests | GDPR Art. 17 right to erasure |
/// | 4 | SoftwareLicenses | asset-register expiry and seat tracking |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDomain {
    /// Security incident register (NIS2 / ISO 27001).
    SecurityIncidents,
    /// Whistleblower report channel (ZZPri).
    WhistleblowerReports,
    /// GDPR data-subject erasure requests.
    ErasureRequests,
    /// Software license register (expiry and seat utilization).
    SoftwareLicenses,
}

/// Total number of alert domains. Used for compile-time assertions.
pub const ALERT_DOMAIN_COUNT: usize = 4;

impl AlertDomain {
    /// Returns all alert domains in canonical (feed) order.
    pub fn all_domains() -> &'static [AlertDomain] {
        &[
            Self::SecurityIncidents,
            Self::WhistleblowerReports,
            Self::ErasureRequests,
            Self::SoftwareLicenses,
        ]
    }

    /// Returns the snake_case string identifier for this domain.
    ///
    /// Must match the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityIncidents => "security_incidents",
            Self::WhistleblowerReports => "whistleblower_reports",
            Self::ErasureRequests => "erasure_requests",
            Self::SoftwareLicenses => "software_licenses",
        }
    }
}

impl std::fmt::Display for AlertDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertDomain {
    type Err = SklError;

    /// Parse an alert domain from its snake_case string identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "security_incidents" => Ok(Self::SecurityIncidents),
            "whistleblower_reports" => Ok(Self::WhistleblowerReports),
            "erasure_requests" => Ok(Self::ErasureRequests),
            "software_licenses" => Ok(Self::SoftwareLicenses),
            other => Err(SklError::Validation(format!(
                "unknown alert domain: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_domains_count() {
        assert_eq!(AlertDomain::all_domains().len(), ALERT_DOMAIN_COUNT);
    }

    #[test]
    fn test_all_domains_unique() {
        let mut seen = std::collections::HashSet::new();
        for d in AlertDomain::all_domains() {
            assert!(seen.insert(d), "Duplicate domain: {d}");
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for domain in AlertDomain::all_domains() {
            let parsed: AlertDomain = domain.as_str().parse().unwrap();
            assert_eq!(*domain, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("nonexistent".parse::<AlertDomain>().is_err());
        assert!("SecurityIncidents".parse::<AlertDomain>().is_err()); // case-sensitive
        assert!("".parse::<AlertDomain>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for domain in AlertDomain::all_domains() {
            let json = serde_json::to_string(domain).unwrap();
            assert_eq!(json, format!("\"{}\"", domain.as_str()));
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        for domain in AlertDomain::all_domains() {
            assert_eq!(domain.to_string(), domain.as_str());
        }
    }
}
