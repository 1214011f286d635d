//! PHP data class generator
//!
//! Generates Laravel Data classes carrying OpenAPI schema attributes and
//! validation attributes derived from the column definitions.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::codegen::{CodeGenerator, GeneratedClass, GenerationMode};
use crate::config::GeneratorConfig;
use crate::error::DtoliftError;
use crate::model::{short_name, ClassModel, KnownTypes, TypeResolver};
use crate::schema::{to_camel_case, ColumnDescriptor, Table};

pub mod render;
pub mod types;
pub mod validation;

pub use render::{render_class, PhpSource};
pub use types::{map_type, HostInteger, PhpType};
pub use validation::{ValidationRule, ValidationRuleDeriver};

/// Class-level attribute marking the class as an API schema
pub const SCHEMA: &str = "OpenApi\\Attributes\\Schema";
/// Property-level attribute exposing the property in the API schema
pub const PROPERTY: &str = "OpenApi\\Attributes\\Property";

/// PHP data class generator
pub struct PhpDataGenerator {
    config: GeneratorConfig,
    deriver: ValidationRuleDeriver,
    types: Box<dyn TypeResolver>,
}

impl PhpDataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let types = default_types(&config);
        let deriver = ValidationRuleDeriver::new(&config.primary_key, config.host_integer);
        Self {
            config,
            deriver,
            types: Box::new(types),
        }
    }

    /// Replace the set of types that are imported and referenced by short name
    pub fn with_types(mut self, types: impl TypeResolver + 'static) -> Self {
        self.types = Box::new(types);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the class model for a table
    ///
    /// Fails when two columns map to the same property name.
    pub fn build_class(
        &self,
        table: &Table,
        mode: &GenerationMode,
    ) -> Result<ClassModel<'_>, DtoliftError> {
        let qualified_name = self.qualified_class_name(table, mode);
        let (namespace, class_name) = split_qualified_name(&qualified_name);
        debug!(namespace = ?namespace, class = ?class_name, "Building class");

        let mut class = ClassModel::new(namespace, class_name, self.types.as_ref());
        class
            .set_comment(table.comment())
            .set_parent_type(self.config.base_data_class.as_deref())
            .use_attribute(SCHEMA);

        let validate = self.config.validation && !matches!(mode, GenerationMode::ValueObject { .. });
        for column in self.select_columns(table, mode) {
            self.build_column(&mut class, column, validate)?;
        }

        Ok(class)
    }

    fn build_column(
        &self,
        class: &mut ClassModel<'_>,
        column: &ColumnDescriptor,
        validate: bool,
    ) -> Result<(), DtoliftError> {
        let php_type = map_type(&column.base_type_name, &column.raw_type);
        let name = to_camel_case(&column.name);
        trace!(column = ?column.name, property = ?name, php_type = ?php_type, "Building property");

        let mut property = class.add_property(
            &name,
            short_name(php_type.as_str()),
            self.column_comment(column),
        )?;
        if php_type.is_external() {
            property.use_import(php_type.as_str());
        }
        property.set_nullable(column.nullable);

        if !self.config.schema_exclude_columns.contains(&column.name) {
            property.use_attribute(PROPERTY);
        }

        if validate {
            for rule in self.deriver.derive(column) {
                property
                    .use_attribute(&rule.attribute())
                    .use_import(rule.import());
            }
        }

        Ok(())
    }

    /// Columns that become properties in the given mode, in table order
    fn select_columns<'t>(
        &self,
        table: &'t Table,
        mode: &GenerationMode,
    ) -> Vec<&'t ColumnDescriptor> {
        table
            .columns
            .iter()
            .filter(|column| {
                if !mode.is_request() {
                    return true;
                }
                if self.config.request_exclude_columns.contains(&column.name) {
                    return false;
                }
                !(*mode == GenerationMode::CreateRequest && column.name == self.config.primary_key)
            })
            .collect()
    }

    /// Explicit column comment, else the configured default for the column
    fn column_comment<'a>(&'a self, column: &'a ColumnDescriptor) -> Option<&'a str> {
        column.comment().or_else(|| {
            self.config
                .default_column_comment
                .get(&column.name)
                .map(String::as_str)
        })
    }

    /// Fully qualified name of the class generated for a table
    pub fn qualified_class_name(&self, table: &Table, mode: &GenerationMode) -> String {
        let studly = table.singular_class_name();
        let relative = match mode {
            GenerationMode::Data => studly,
            GenerationMode::CreateRequest => format!("Requests\\Create{studly}Request"),
            GenerationMode::UpdateRequest => format!("Requests\\Update{studly}Request"),
            GenerationMode::ValueObject { class_name } => {
                let mut name = class_name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .map(|name| name.replace('/', "\\"))
                    .unwrap_or_else(|| format!("{studly}Vo"));
                if !name.ends_with("Vo") {
                    name.push_str("Vo");
                }
                format!("Vos\\{name}")
            }
        };

        [
            self.config.root_namespace.trim_matches('\\'),
            self.config.data_namespace.trim_matches('\\'),
            relative.as_str(),
        ]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
    }

    /// Output path for a fully qualified class name
    ///
    /// The root namespace maps to the configured app path, every remaining
    /// namespace segment to a directory.
    pub fn class_path(&self, qualified_name: &str) -> PathBuf {
        let root = self.config.root_namespace.trim_matches('\\');
        let relative = if root.is_empty() {
            qualified_name
        } else {
            qualified_name
                .strip_prefix(root)
                .and_then(|rest| rest.strip_prefix('\\'))
                .unwrap_or(qualified_name)
        };

        let mut path = self.config.app_path.clone();
        let mut segments = relative.split('\\').filter(|s| !s.is_empty()).peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.php"));
            }
        }
        path
    }
}

impl CodeGenerator for PhpDataGenerator {
    fn generate(
        &self,
        table: &Table,
        mode: &GenerationMode,
    ) -> Result<GeneratedClass, DtoliftError> {
        let class = self.build_class(table, mode)?;
        let qualified_name = match class.namespace() {
            "" => class.class_name().to_string(),
            namespace => format!("{}\\{}", namespace, class.class_name()),
        };

        Ok(GeneratedClass {
            path: self.class_path(&qualified_name),
            source: render_class(&class),
            qualified_name,
        })
    }
}

/// Types the generator imports and references by their short names
fn default_types(config: &GeneratorConfig) -> KnownTypes {
    let mut types: KnownTypes = [
        SCHEMA,
        PROPERTY,
        types::CARBON,
        validation::MAX,
        validation::MIN,
        validation::BETWEEN,
        validation::REQUIRED,
        validation::FROM_ROUTE_PARAMETER,
    ]
    .into_iter()
    .collect();

    if let Some(base) = &config.base_data_class {
        types.insert(base);
    }
    types
}

fn split_qualified_name(qualified_name: &str) -> (&str, &str) {
    qualified_name
        .rsplit_once('\\')
        .unwrap_or(("", qualified_name))
}
