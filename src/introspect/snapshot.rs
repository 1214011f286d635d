use std::fs;
use std::path::Path;

use tracing::{debug, error, info, trace};

use crate::prelude::{DtoliftError, SchemaSnapshot, Table};

use super::Introspector;

/// Introspector backed by a JSON schema snapshot
///
/// The snapshot has the shape `{"tables": [{"name", "comment", "columns":
/// [{"name", "type", "type_name", "nullable", "comment"}]}]}`.
#[derive(Debug, Clone)]
pub struct SnapshotIntrospector {
    source_name: String,
    snapshot: SchemaSnapshot,
}

impl SnapshotIntrospector {
    pub fn new(source_name: &str, snapshot: SchemaSnapshot) -> Self {
        Self {
            source_name: source_name.to_string(),
            snapshot,
        }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(source_name: &str, json: &str) -> Result<Self, DtoliftError> {
        let snapshot: SchemaSnapshot = serde_json::from_str(json).map_err(|e| {
            error!(source = ?source_name, error = ?e, "Invalid schema snapshot");
            DtoliftError::Introspection {
                source_name: source_name.to_string(),
                message: format!("Invalid schema snapshot: {}", e),
            }
        })?;

        debug!(source = ?source_name, tables = ?snapshot.tables.len(), "Loaded schema snapshot");
        Ok(Self::new(source_name, snapshot))
    }

    /// Read a snapshot file
    pub fn from_file(path: &Path) -> Result<Self, DtoliftError> {
        let source_name = path.display().to_string();
        info!(path = ?path, "Reading schema snapshot");

        let json = fs::read_to_string(path).map_err(|e| {
            error!(path = ?path, error = ?e, "Failed to read schema snapshot");
            DtoliftError::Introspection {
                source_name: source_name.clone(),
                message: format!("Failed to read file: {}", e),
            }
        })?;

        Self::from_json(&source_name, &json)
    }
}

impl Introspector for SnapshotIntrospector {
    fn table(&mut self, table_name: &str) -> Result<Table, DtoliftError> {
        trace!(source = ?self.source_name, table = ?table_name, "Looking up table");

        self.snapshot.table(table_name).cloned().ok_or_else(|| {
            error!(source = ?self.source_name, table = ?table_name, "Table not found");
            DtoliftError::MissingTable(table_name.to_string())
        })
    }
}
