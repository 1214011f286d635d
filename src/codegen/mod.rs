//! Code generation
//!
//! This module turns an introspected table into the source text of a
//! generated class, plus the path the class should be written to.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::prelude::{DtoliftError, Introspector, Table};

pub mod php;

pub use php::PhpDataGenerator;

/// Kind of class to generate for a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Plain data class with every column
    #[default]
    Data,
    /// Request class for creating a record: no primary key, no excluded columns
    CreateRequest,
    /// Request class for updating a record: keeps the primary key
    UpdateRequest,
    /// Value object without validation, optionally with an explicit class name
    ValueObject { class_name: Option<String> },
}

impl GenerationMode {
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            GenerationMode::CreateRequest | GenerationMode::UpdateRequest
        )
    }
}

/// Output of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    /// Fully qualified class name
    pub qualified_name: String,
    /// Suggested output path, relative to the project root
    pub path: PathBuf,
    /// Rendered source text
    pub source: String,
}

impl GeneratedClass {
    /// Write the source below `base_dir`, creating directories as needed
    ///
    /// An existing file is only replaced when `overwrite` is set.
    pub fn write_to(&self, base_dir: &Path, overwrite: bool) -> Result<PathBuf, DtoliftError> {
        let path = base_dir.join(&self.path);

        if path.exists() && !overwrite {
            return Err(DtoliftError::AlreadyExists(path));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
                debug!(path = ?parent, "Created output directory");
            }
        }

        fs::write(&path, &self.source)?;
        info!(path = ?path, "Wrote class file");

        Ok(path)
    }
}

/// Trait for language-specific code generators
pub trait CodeGenerator {
    /// Generate the class for one table
    fn generate(&self, table: &Table, mode: &GenerationMode)
        -> Result<GeneratedClass, DtoliftError>;
}

/// Look up a table and generate its class
///
/// Fails with [`DtoliftError::MissingTable`] before any generation work when
/// the table is unknown to the introspector.
pub fn generate_for_table(
    introspector: &mut dyn Introspector,
    generator: &dyn CodeGenerator,
    table_name: &str,
    mode: &GenerationMode,
) -> Result<GeneratedClass, DtoliftError> {
    info!(table = ?table_name, mode = ?mode, "Generating class");

    let table = introspector.table(table_name)?;
    debug!(table = ?table.name, columns = ?table.columns.len(), "Loaded table");

    let generated = generator.generate(&table, mode)?;
    info!(
        class = ?generated.qualified_name,
        path = ?generated.path,
        "Class generated"
    );

    Ok(generated)
}
