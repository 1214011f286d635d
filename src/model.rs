//! Class model
//!
//! In-memory representation of a class under construction. A generator
//! declares the class once and then configures it incrementally; the
//! renderer consumes the finished model read-only.

use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::error::DtoliftError;

/// Marker prefixed to a type expression to make it nullable
pub const NULLABLE_MARKER: char = '?';

/// Decides whether a symbol names an external type that must be imported
pub trait TypeResolver {
    fn is_known_type(&self, name: &str) -> bool;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> bool,
{
    fn is_known_type(&self, name: &str) -> bool {
        self(name)
    }
}

/// A fixed set of fully qualified type names
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    types: HashSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str) -> Self {
        self.insert(name);
        self
    }

    pub fn insert(&mut self, name: &str) {
        self.types.insert(name.to_string());
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl TypeResolver for KnownTypes {
    fn is_known_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }
}

/// Last `\`-separated segment of a qualified name
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit('\\').next().unwrap_or(qualified)
}

/// Import `symbol` when it is a known type and return the name to reference it by
fn resolve_symbol(
    types: &dyn TypeResolver,
    imports: &mut IndexSet<String>,
    symbol: &str,
) -> String {
    if types.is_known_type(symbol) {
        add_import(imports, symbol);
        short_name(symbol).to_string()
    } else {
        symbol.to_string()
    }
}

fn add_import(imports: &mut IndexSet<String>, import: &str) {
    if imports.insert(import.to_string()) {
        trace!(import = ?import, "Registered import");
    }
}

/// The class being generated
pub struct ClassModel<'t> {
    namespace: String,
    class_name: String,
    parent_type: Option<String>,
    comment: Option<String>,
    imports: IndexSet<String>,
    attributes: Vec<String>,
    properties: IndexMap<String, PropertyModel>,
    types: &'t dyn TypeResolver,
}

impl<'t> ClassModel<'t> {
    pub fn new(namespace: &str, class_name: &str, types: &'t dyn TypeResolver) -> Self {
        Self {
            namespace: namespace.to_string(),
            class_name: class_name.to_string(),
            parent_type: None,
            comment: None,
            imports: IndexSet::new(),
            attributes: Vec::new(),
            properties: IndexMap::new(),
            types,
        }
    }

    /// Set the parent class, importing it when it is a known type
    pub fn set_parent_type(&mut self, parent_type: Option<&str>) -> &mut Self {
        self.parent_type =
            parent_type.map(|parent| resolve_symbol(self.types, &mut self.imports, parent));
        self
    }

    pub fn set_comment(&mut self, comment: Option<&str>) -> &mut Self {
        self.comment = comment.map(str::to_string);
        self
    }

    /// Register imports; an import already present keeps its first position
    pub fn use_import(&mut self, import: &str) -> &mut Self {
        add_import(&mut self.imports, import);
        self
    }

    /// Add a class-level attribute
    ///
    /// A known type is imported and referenced by its short name, anything
    /// else is kept verbatim.
    pub fn use_attribute(&mut self, attribute: &str) -> &mut Self {
        let attribute = resolve_symbol(self.types, &mut self.imports, attribute);
        self.attributes.push(attribute);
        self
    }

    /// Add a property and return a handle for configuring it
    ///
    /// Property names are unique within a class.
    pub fn add_property(
        &mut self,
        name: &str,
        ty: &str,
        comment: Option<&str>,
    ) -> Result<PropertyHandle<'_>, DtoliftError> {
        if self.properties.contains_key(name) {
            return Err(DtoliftError::DuplicateProperty {
                class: self.class_name.clone(),
                property: name.to_string(),
            });
        }

        let ty = resolve_symbol(self.types, &mut self.imports, ty);
        let property = PropertyModel {
            name: name.to_string(),
            ty,
            nullable: false,
            comment: comment.map(str::to_string),
            attributes: Vec::new(),
        };

        let property = self.properties.entry(name.to_string()).or_insert(property);
        Ok(PropertyHandle {
            property,
            imports: &mut self.imports,
            types: self.types,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyModel> {
        self.properties.values()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyModel> {
        self.properties.get(name)
    }
}

impl fmt::Debug for ClassModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassModel")
            .field("namespace", &self.namespace)
            .field("class_name", &self.class_name)
            .field("parent_type", &self.parent_type)
            .field("comment", &self.comment)
            .field("imports", &self.imports)
            .field("attributes", &self.attributes)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// One generated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyModel {
    name: String,
    ty: String,
    nullable: bool,
    comment: Option<String>,
    attributes: Vec<String>,
}

impl PropertyModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type expression, prefixed with the nullable marker when nullable
    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// Mutable access to a property that was just added to a [`ClassModel`]
///
/// Imports registered through the handle land in the owning class.
pub struct PropertyHandle<'m> {
    property: &'m mut PropertyModel,
    imports: &'m mut IndexSet<String>,
    types: &'m dyn TypeResolver,
}

impl PropertyHandle<'_> {
    /// Toggle nullability, keeping the type's nullable marker in step
    pub fn set_nullable(&mut self, nullable: bool) -> &mut Self {
        let base = self.property.ty.trim_start_matches(NULLABLE_MARKER);
        self.property.ty = if nullable {
            format!("{NULLABLE_MARKER}{base}")
        } else {
            base.to_string()
        };
        self.property.nullable = nullable;
        self
    }

    /// Add a property-level attribute, importing it when it is a known type
    pub fn use_attribute(&mut self, attribute: &str) -> &mut Self {
        let attribute = resolve_symbol(self.types, self.imports, attribute);
        self.property.attributes.push(attribute);
        self
    }

    pub fn use_import(&mut self, import: &str) -> &mut Self {
        add_import(self.imports, import);
        self
    }

    pub fn property(&self) -> &PropertyModel {
        self.property
    }
}

impl fmt::Debug for PropertyHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyHandle")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARBON: &str = "Carbon\\Carbon";
    const SCHEMA: &str = "OpenApi\\Attributes\\Schema";

    fn known() -> KnownTypes {
        KnownTypes::new().with(CARBON).with(SCHEMA)
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Carbon\\Carbon"), "Carbon");
        assert_eq!(short_name("int"), "int");
    }

    #[test]
    fn test_duplicate_property_is_rejected() {
        let types = known();
        let mut class = ClassModel::new("App\\Data", "User", &types);
        class.add_property("userId", "int", None).unwrap();

        let err = class.add_property("userId", "string", None).unwrap_err();
        match err {
            DtoliftError::DuplicateProperty { class, property } => {
                assert_eq!(class, "User");
                assert_eq!(property, "userId");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(class.property("userId").unwrap().ty(), "int");
    }

    #[test]
    fn test_nullable_round_trip() {
        let types = known();
        let mut class = ClassModel::new("App\\Data", "User", &types);
        let mut prop = class.add_property("name", "string", None).unwrap();

        prop.set_nullable(true);
        assert_eq!(prop.property().ty(), "?string");
        assert!(prop.property().is_nullable());

        prop.set_nullable(true);
        assert_eq!(prop.property().ty(), "?string");

        prop.set_nullable(false);
        assert_eq!(prop.property().ty(), "string");
        assert!(!prop.property().is_nullable());
    }

    #[test]
    fn test_known_property_type_is_imported_once() {
        let types = known();
        let mut class = ClassModel::new("App\\Data", "User", &types);
        class.add_property("createdAt", CARBON, None).unwrap();
        class.add_property("updatedAt", CARBON, None).unwrap();

        assert_eq!(class.imports().collect::<Vec<_>>(), vec![CARBON]);
        assert_eq!(class.property("createdAt").unwrap().ty(), "Carbon");
    }

    #[test]
    fn test_imports_keep_first_use_order() {
        let types = known();
        let mut class = ClassModel::new("App\\Data", "User", &types);
        class.use_attribute(SCHEMA);
        class.add_property("createdAt", CARBON, None).unwrap();
        class.use_import(SCHEMA).use_import("App\\Foo");

        assert_eq!(
            class.imports().collect::<Vec<_>>(),
            vec![SCHEMA, CARBON, "App\\Foo"]
        );
        assert_eq!(class.attributes(), &["Schema".to_string()]);
    }

    #[test]
    fn test_unknown_symbols_stay_verbatim() {
        let types = known();
        let mut class = ClassModel::new("App\\Data", "User", &types);
        class.set_parent_type(Some("Vendor\\Missing\\Base"));
        let mut prop = class.add_property("age", "int", None).unwrap();
        prop.use_attribute("Max(10)");

        assert_eq!(class.parent_type(), Some("Vendor\\Missing\\Base"));
        assert_eq!(class.property("age").unwrap().attributes(), &["Max(10)".to_string()]);
        assert_eq!(class.imports().count(), 0);
    }

    #[test]
    fn test_known_parent_type_is_imported() {
        let types = |name: &str| name == "App\\Data\\BaseData";
        let mut class = ClassModel::new("App\\Data", "User", &types);
        class.set_parent_type(Some("App\\Data\\BaseData"));

        assert_eq!(class.parent_type(), Some("BaseData"));
        assert_eq!(class.imports().collect::<Vec<_>>(), vec!["App\\Data\\BaseData"]);
    }
}
