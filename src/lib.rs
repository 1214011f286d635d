//! # dtolift
//!
//! Generate data transfer classes from database table schemas
//!
//! This crate provides a CLI tool and library for turning a table's column
//! definitions into a PHP data class with typed properties, OpenAPI schema
//! attributes and validation attributes.

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;
pub mod model;
pub mod schema;

pub mod prelude {
    pub use crate::codegen::{
        generate_for_table, CodeGenerator, GeneratedClass, GenerationMode, PhpDataGenerator,
    };
    pub use crate::config::GeneratorConfig;
    pub use crate::error::DtoliftError;
    pub use crate::introspect::{Introspector, SnapshotIntrospector};
    pub use crate::model::{ClassModel, KnownTypes, PropertyModel, TypeResolver};
    pub use crate::schema::{ColumnDescriptor, SchemaSnapshot, Table};
}
