//! # Identity Newtypes
//!
//! Newtype wrappers for the identifier namespaces in the Skladno stack.
//! You cannot pass a `RecordId` where an `OrganizationId` is expected.
//!
//! ## Tenancy Invariant
//!
//! `OrganizationId` is the tenant-isolation key. Every record belongs to
//! exactly one organization and every store read is filtered by it; keeping
//! the key a distinct type makes an unscoped query a compile error at the
//! repository seam.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SklError;

/// Tenant-isolation key. Every record belongs to exactly one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(pub Uuid);

/// Unique identifier for a single record within any domain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl OrganizationId {
    /// Generate a new random organization identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a canonical UUID string.
    pub fn parse(s: &str) -> Result<Self, SklError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| SklError::Validation(format!("invalid organization id {s:?}: {e}")))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl RecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a canonical UUID string.
    pub fn parse(s: &str) -> Result<Self, SklError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| SklError::Validation(format!("invalid record id {s:?}: {e}")))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrganizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "org:{}", self.0)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(OrganizationId::new(), OrganizationId::new());
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_parse_roundtrip() {
        let org = OrganizationId::new();
        let parsed = OrganizationId::parse(&org.as_uuid().to_string()).unwrap();
        assert_eq!(org, parsed);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(OrganizationId::parse("not-a-uuid").is_err());
        assert!(RecordId::parse("").is_err());
    }

    #[test]
    fn test_display_prefixes() {
        let org = OrganizationId::new();
        assert!(org.to_string().starts_with("org:"));
        let rec = RecordId::new();
        assert!(rec.to_string().starts_with("record:"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let rec = RecordId::new();
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, parsed);
    }
}
