//! # Change Notifications
//!
//! A transport-agnostic publish/subscribe interface for "this table may
//! have changed" events. Consumers subscribe per table and receive
//! invalidation events carrying the table and organization; what transport
//! delivered the underlying change (a realtime channel, a local write, a
//! migration) is not their concern.
//!
//! Built on tokio broadcast channels: slow subscribers lag and drop the
//! oldest events, which is acceptable for invalidation signals — a missed
//! event at worst delays a re-fetch until the next write.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::broadcast;

use skl_core::{OrganizationId, SklError};

/// The managed record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Security incident register.
    Incidents,
    /// Whistleblower reports.
    Reports,
    /// Erasure requests.
    ErasureRequests,
    /// Software license register.
    Licenses,
}

impl Table {
    /// All tables in canonical order.
    pub fn all_tables() -> &'static [Table] {
        &[
            Self::Incidents,
            Self::Reports,
            Self::ErasureRequests,
            Self::Licenses,
        ]
    }

    /// Returns the snake_case table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Reports => "reports",
            Self::ErasureRequests => "erasure_requests",
            Self::Licenses => "licenses",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = SklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incidents" => Ok(Self::Incidents),
            "reports" => Ok(Self::Reports),
            "erasure_requests" => Ok(Self::ErasureRequests),
            "licenses" => Ok(Self::Licenses),
            other => Err(SklError::Validation(format!("unknown table: {other:?}"))),
        }
    }
}

/// An invalidation event: the named table may have changed for the named
/// organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The table that changed.
    pub table: Table,
    /// The organization whose rows changed.
    pub organization_id: OrganizationId,
}

/// Per-table broadcast of [`ChangeEvent`]s.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    channels: HashMap<Table, broadcast::Sender<ChangeEvent>>,
}

impl ChangeNotifier {
    /// Create a notifier with the given per-table buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        for table in Table::all_tables() {
            let (tx, _) = broadcast::channel(capacity);
            channels.insert(*table, tx);
        }
        Self { channels }
    }

    /// Subscribe to invalidation events for one table.
    pub fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent> {
        // Constructor registers every Table variant, so the lookup cannot
        // miss.
        self.channels[&table].subscribe()
    }

    /// Publish an invalidation event. Events with no subscribers are
    /// dropped silently; notification is best-effort.
    pub fn notify(&self, event: ChangeEvent) {
        if let Some(tx) = self.channels.get(&event.table) {
            let _ = tx.send(event);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}
