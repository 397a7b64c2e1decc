//! # In-Memory Record Store
//!
//! The store the API layer serves from. Always present: with a database
//! configured it mirrors Postgres (loaded at startup, written through on
//! mutation); without one it is the only store, suitable for development
//! and testing.
//!
//! Every read is scoped by `OrganizationId` — there is no unscoped list
//! operation on purpose.

use parking_lot::RwLock;

use skl_alerts::Snapshot;
use skl_core::{OrganizationId, RecordId};
use skl_records::{ErasureRequest, SecurityIncident, SoftwareLicense, WhistleblowerReport};

/// Thread-safe in-memory store for the four record tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    incidents: RwLock<Vec<SecurityIncident>>,
    reports: RwLock<Vec<WhistleblowerReport>>,
    erasure_requests: RwLock<Vec<ErasureRequest>>,
    licenses: RwLock<Vec<SoftwareLicense>>,
}

macro_rules! table_ops {
    ($list:ident, $get:ident, $upsert:ident, $remove:ident, $field:ident, $ty:ty) => {
        /// List all records of this table belonging to one organization,
        /// in insertion order.
        pub fn $list(&self, org: OrganizationId) -> Vec<$ty> {
            self.$field
                .read()
                .iter()
                .filter(|r| r.organization_id == org)
                .cloned()
                .collect()
        }

        /// Fetch a single record by id within an organization.
        pub fn $get(&self, org: OrganizationId, id: RecordId) -> Option<$ty> {
            self.$field
                .read()
                .iter()
                .find(|r| r.organization_id == org && r.id == id)
                .cloned()
        }

        /// Insert or replace a record, keyed by `(organization_id, id)`.
        pub fn $upsert(&self, record: $ty) {
            let mut rows = self.$field.write();
            match rows
                .iter_mut()
                .find(|r| r.organization_id == record.organization_id && r.id == record.id)
            {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
        }

        /// Remove a record. Returns whether anything was removed.
        pub fn $remove(&self, org: OrganizationId, id: RecordId) -> bool {
            let mut rows = self.$field.write();
            let before = rows.len();
            rows.retain(|r| !(r.organization_id == org && r.id == id));
            rows.len() != before
        }
    };
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    table_ops!(
        list_incidents,
        get_incident,
        upsert_incident,
        remove_incident,
        incidents,
        SecurityIncident
    );
    table_ops!(
        list_reports,
        get_report,
        upsert_report,
        remove_report,
        reports,
        WhistleblowerReport
    );
    table_ops!(
        list_erasure_requests,
        get_erasure_request,
        upsert_erasure_request,
        remove_erasure_request,
        erasure_requests,
        ErasureRequest
    );
    table_ops!(
        list_licenses,
        get_license,
        upsert_license,
        remove_license,
        licenses,
        SoftwareLicense
    );

    /// An immutable snapshot of all four tables for one organization —
    /// the aggregator's input.
    pub fn snapshot(&self, org: OrganizationId) -> Snapshot {
        Snapshot {
            incidents: self.list_incidents(org),
            reports: self.list_reports(org),
            erasure_requests: self.list_erasure_requests(org),
            licenses: self.list_licenses(org),
        }
    }

    /// Replace the full contents of every table (startup load from the
    /// database).
    pub fn replace_all(
        &self,
        incidents: Vec<SecurityIncident>,
        reports: Vec<WhistleblowerReport>,
        erasure_requests: Vec<ErasureRequest>,
        licenses: Vec<SoftwareLicense>,
    ) {
        *self.incidents.write() = incidents;
        *self.reports.write() = reports;
        *self.erasure_requests.write() = erasure_requests;
        *self.licenses.write() = licenses;
    }
}
