//! # Snapshot Cache
//!
//! A read cache for store queries, keyed by `(Table, OrganizationId)`.
//! Entries are invalidated by explicit events only: a [`ChangeEvent`] from
//! the notifier, or an organization switch. Nothing here expires by time or
//! component lifecycle.

use parking_lot::RwLock;
use std::collections::HashMap;

use skl_core::OrganizationId;
use skl_records::{ErasureRequest, SecurityIncident, SoftwareLicense, WhistleblowerReport};

use crate::notify::{ChangeEvent, Table};

/// The cached rows of one table for one organization.
#[derive(Debug, Clone)]
pub enum TableRows {
    /// Rows of the incidents table.
    Incidents(Vec<SecurityIncident>),
    /// Rows of the reports table.
    Reports(Vec<WhistleblowerReport>),
    /// Rows of the erasure requests table.
    ErasureRequests(Vec<ErasureRequest>),
    /// Rows of the licenses table.
    Licenses(Vec<SoftwareLicense>),
}

impl TableRows {
    /// The table these rows belong to.
    pub fn table(&self) -> Table {
        match self {
            Self::Incidents(_) => Table::Incidents,
            Self::Reports(_) => Table::Reports,
            Self::ErasureRequests(_) => Table::ErasureRequests,
            Self::Licenses(_) => Table::Licenses,
        }
    }
}

/// Cache of per-table, per-organization row lists.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: RwLock<HashMap<(Table, OrganizationId), TableRows>>,
}

impl SnapshotCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch cached rows for a key, if present.
    pub fn get(&self, table: Table, org: OrganizationId) -> Option<TableRows> {
        self.entries.read().get(&(table, org)).cloned()
    }

    /// Store rows under their `(table, organization)` key.
    pub fn put(&self, org: OrganizationId, rows: TableRows) {
        self.entries.write().insert((rows.table(), org), rows);
    }

    /// Drop one key.
    pub fn invalidate(&self, table: Table, org: OrganizationId) {
        self.entries.write().remove(&(table, org));
    }

    /// Drop every entry for an organization (organization switch).
    pub fn invalidate_org(&self, org: OrganizationId) {
        self.entries.write().retain(|(_, o), _| *o != org);
    }

    /// Apply a change-notification event.
    pub fn apply(&self, event: ChangeEvent) {
        self.invalidate(event.table, event.organization_id);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skl_core::Timestamp;

    fn incident_rows(org: OrganizationId) -> TableRows {
        let now = Timestamp::parse("2026-03-02T00:00:00Z").unwrap();
        let inc =
            SecurityIncident::new(org, Timestamp::parse("2026-03-01T00:00:00Z").unwrap(), now)
                .unwrap();
        TableRows::Incidents(vec![inc])
    }

    #[test]
    fn test_put_get_roundtrip() {
        let cache = SnapshotCache::new();
        let org = OrganizationId::new();
        cache.put(org, incident_rows(org));
        assert!(cache.get(Table::Incidents, org).is_some());
        assert!(cache.get(Table::Licenses, org).is_none());
    }

    #[test]
    fn test_change_event_invalidates_exact_key() {
        let cache = SnapshotCache::new();
        let org_a = OrganizationId::new();
        let org_b = OrganizationId::new();
        cache.put(org_a, incident_rows(org_a));
        cache.put(org_b, incident_rows(org_b));

        cache.apply(ChangeEvent {
            table: Table::Incidents,
            organization_id: org_a,
        });

        assert!(cache.get(Table::Incidents, org_a).is_none());
        assert!(cache.get(Table::Incidents, org_b).is_some());
    }

    #[test]
    fn test_organization_switch_drops_all_tables() {
        let cache = SnapshotCache::new();
        let org = OrganizationId::new();
        cache.put(org, incident_rows(org));
        cache.put(org, TableRows::Licenses(vec![]));
        assert_eq!(cache.len(), 2);

        cache.invalidate_org(org);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unrelated_event_leaves_entry() {
        let cache = SnapshotCache::new();
        let org = OrganizationId::new();
        cache.put(org, incident_rows(org));
        cache.apply(ChangeEvent {
            table: Table::Licenses,
            organization_id: org,
        });
        assert!(cache.get(Table::Incidents, org).is_some());
    }
}
