pub mod loader;
pub mod schema;
pub mod snapshot;

pub use loader::{LoadReport, WarehouseLoader};
pub use schema::{ColumnDef, ColumnType, TableSchema};
pub use snapshot::SnapshotRows;

use std::fmt;

/// Progress of a warehouse load. `Closed` is reached from every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Disconnected,
    Connected,
    TableChecked,
    TableCreatedIfAbsent,
    Cleared,
    Loaded,
    Closed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Disconnected => "disconnected",
            LoadPhase::Connected => "connected",
            LoadPhase::TableChecked => "checking table",
            LoadPhase::TableCreatedIfAbsent => "creating table",
            LoadPhase::Cleared => "clearing table",
            LoadPhase::Loaded => "loading rows",
            LoadPhase::Closed => "closed",
        };
        f.write_str(name)
    }
}
