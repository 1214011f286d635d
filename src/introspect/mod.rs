//! Schema introspection
//!
//! This module provides the seam through which table definitions reach the
//! generator. Sources look a table up by name and return its columns.

use crate::prelude::{DtoliftError, Table};

mod snapshot;

pub use snapshot::SnapshotIntrospector;

/// Trait for schema introspection implementations
pub trait Introspector {
    /// Describe a single table
    ///
    /// Returns [`DtoliftError::MissingTable`] when the table does not exist.
    fn table(&mut self, table_name: &str) -> Result<Table, DtoliftError>;
}
