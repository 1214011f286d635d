//! Schema data structures
//!
//! These types represent table schema information and form the contract
//! between introspection (produces) and code generation (consumes).

use serde::Deserialize;

/// A schema snapshot: every table the introspection source knows about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl SchemaSnapshot {
    /// Find a table by exact name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}

/// Database table
#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub name: String,
    /// Table-level comment, if any
    #[serde(default)]
    pub comment: Option<String>,
    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl Table {
    /// Returns the StudlyCase class name of the singular table name
    pub fn singular_class_name(&self) -> String {
        to_studly_case(&self.singular_name())
    }

    /// Returns singular form of the table name in snake_case (basic heuristic)
    ///
    /// Only the last word is singularized, so `order_statuses` becomes
    /// `order_status`.
    pub fn singular_name(&self) -> String {
        match self.name.rsplit_once('_') {
            Some((head, last)) => format!("{}_{}", head, singularize(last)),
            None => singularize(&self.name),
        }
    }

    /// Table comment, treating an empty string as absent
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// A table column as reported by the schema source
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Full column type, e.g. `varchar(255)` or `tinyint(1) unsigned`
    #[serde(rename = "type")]
    pub raw_type: String,
    /// Type keyword without length or modifiers, e.g. `varchar`
    #[serde(rename = "type_name")]
    pub base_type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: &str, base_type_name: &str, raw_type: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            base_type_name: base_type_name.to_string(),
            nullable: false,
            comment: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Column comment, treating an empty string as absent
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// Words with no distinct singular form
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "series",
    "sheep",
    "species",
    "staff",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("people", "person"),
    ("women", "woman"),
];

/// Singular form of a single English word (basic heuristic)
pub fn singularize(word: &str) -> String {
    if !word.is_ascii() {
        return word.to_string();
    }
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }

    if lower.ends_with("ies") && lower.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if ["sses", "xes", "zzes", "ches", "shes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
        || (lower.ends_with("uses") && !lower.ends_with("ouses") && !lower.ends_with("auses"))
    {
        word[..word.len() - 2].to_string()
    } else if ["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix)) {
        // Already singular: address, status, analysis
        word.to_string()
    } else if lower.ends_with('s') && lower.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Convert snake_case (or kebab/space separated) words to StudlyCase
///
/// Existing interior capitals are kept, so `userId` becomes `UserId`.
pub fn to_studly_case(s: &str) -> String {
    s.split(['_', '-', ' '])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    let first_upper = first.to_uppercase().to_string();
                    first_upper + chars.as_str()
                }
            }
        })
        .collect()
}

/// Convert a column name to a camelCase property name
pub fn to_camel_case(s: &str) -> String {
    let studly = to_studly_case(s);
    let mut chars = studly.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().to_string() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Table {
        Table {
            name: name.to_string(),
            comment: None,
            columns: vec![],
        }
    }

    #[test]
    fn test_singular_class_name_regular_plural() {
        assert_eq!(table("users").singular_class_name(), "User");
    }

    #[test]
    fn test_singular_class_name_ies_plural() {
        assert_eq!(table("categories").singular_class_name(), "Category");
    }

    #[test]
    fn test_singular_class_name_snake_case() {
        assert_eq!(table("order_line_items").singular_class_name(), "OrderLineItem");
    }

    #[test]
    fn test_singular_class_name_no_change() {
        assert_eq!(table("staff").singular_class_name(), "Staff");
        assert_eq!(table("address").singular_class_name(), "Address");
    }

    #[test]
    fn test_singular_class_name_es_plurals() {
        assert_eq!(table("addresses").singular_class_name(), "Address");
        assert_eq!(table("statuses").singular_class_name(), "Status");
        assert_eq!(table("boxes").singular_class_name(), "Box");
        assert_eq!(table("branches").singular_class_name(), "Branch");
        assert_eq!(table("wishes").singular_class_name(), "Wish");
        assert_eq!(table("order_statuses").singular_class_name(), "OrderStatus");
        assert_eq!(table("warehouses").singular_class_name(), "Warehouse");
    }

    #[test]
    fn test_singular_class_name_already_singular() {
        assert_eq!(table("status").singular_class_name(), "Status");
        assert_eq!(table("user_address").singular_class_name(), "UserAddress");
        assert_eq!(table("analysis").singular_class_name(), "Analysis");
    }

    #[test]
    fn test_singular_class_name_uncountable_and_irregular() {
        assert_eq!(table("news").singular_class_name(), "News");
        assert_eq!(table("series").singular_class_name(), "Series");
        assert_eq!(table("people").singular_class_name(), "Person");
        assert_eq!(table("team_children").singular_class_name(), "TeamChild");
    }

    #[test]
    fn test_empty_table_comment_is_absent() {
        let mut t = table("users");
        t.comment = Some(String::new());
        assert_eq!(t.comment(), None);
        t.comment = Some("Users".to_string());
        assert_eq!(t.comment(), Some("Users"));
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("user_id"), "userId");
        assert_eq!(to_camel_case("userId"), "userId");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case("created_at"), "createdAt");
    }

    #[test]
    fn test_to_studly_case() {
        assert_eq!(to_studly_case("order_status"), "OrderStatus");
        assert_eq!(to_studly_case("order-status"), "OrderStatus");
        assert_eq!(to_studly_case("user"), "User");
    }

    #[test]
    fn test_column_deserializes_from_snapshot_shape() {
        let json = r#"{"name":"email","type":"varchar(191)","type_name":"varchar","nullable":true,"comment":""}"#;
        let column: ColumnDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(column.raw_type, "varchar(191)");
        assert_eq!(column.base_type_name, "varchar");
        assert!(column.nullable);
        assert_eq!(column.comment(), None);
    }
}
