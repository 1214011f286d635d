//! Validation attributes derived from column definitions

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use super::types::{int_range, is_boolean_column, normalize_type_name, HostInteger, IntRange};
use crate::schema::ColumnDescriptor;

pub const MAX: &str = "Spatie\\LaravelData\\Attributes\\Validation\\Max";
pub const MIN: &str = "Spatie\\LaravelData\\Attributes\\Validation\\Min";
pub const BETWEEN: &str = "Spatie\\LaravelData\\Attributes\\Validation\\Between";
pub const REQUIRED: &str = "Spatie\\LaravelData\\Attributes\\Validation\\Required";
pub const FROM_ROUTE_PARAMETER: &str = "Spatie\\LaravelData\\Attributes\\FromRouteParameter";

static LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("valid length pattern"));

/// A validation attribute for one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Maximum string length
    MaxLength(u64),
    /// Non-nullable boolean, which Laravel Data would otherwise treat as optional
    Required,
    Between(i64, i64),
    Min(i64),
    Max(i64),
    /// Fill the property from the named route parameter
    FromRouteParameter(String),
}

impl ValidationRule {
    /// Attribute expression, referencing the symbol by its short name
    pub fn attribute(&self) -> String {
        match self {
            ValidationRule::MaxLength(len) => format!("Max({len})"),
            ValidationRule::Required => "Required".to_string(),
            ValidationRule::Between(min, max) => format!("Between({min}, {max})"),
            ValidationRule::Min(min) => format!("Min({min})"),
            ValidationRule::Max(max) => format!("Max({max})"),
            ValidationRule::FromRouteParameter(name) => format!("FromRouteParameter('{name}')"),
        }
    }

    /// Fully qualified symbol the attribute needs imported
    pub fn import(&self) -> &'static str {
        match self {
            ValidationRule::MaxLength(_) | ValidationRule::Max(_) => MAX,
            ValidationRule::Required => REQUIRED,
            ValidationRule::Between(..) => BETWEEN,
            ValidationRule::Min(_) => MIN,
            ValidationRule::FromRouteParameter(_) => FROM_ROUTE_PARAMETER,
        }
    }
}

/// Derives validation rules for columns
#[derive(Debug, Clone)]
pub struct ValidationRuleDeriver {
    primary_key: String,
    host: HostInteger,
}

impl ValidationRuleDeriver {
    pub fn new(primary_key: &str, host: HostInteger) -> Self {
        Self {
            primary_key: primary_key.to_string(),
            host,
        }
    }

    /// Rules for a column, in attribute order
    pub fn derive(&self, column: &ColumnDescriptor) -> Vec<ValidationRule> {
        let mut rules = Vec::new();

        let base_type = normalize_type_name(&column.base_type_name);
        if base_type == "varchar" || base_type == "char" {
            match declared_length(&column.raw_type) {
                Some(len) => rules.push(ValidationRule::MaxLength(len)),
                None => warn!(
                    column = ?column.name,
                    raw_type = ?column.raw_type,
                    "No declared length, skipping max length rule"
                ),
            }
        }

        if is_boolean_column(&column.raw_type) {
            if !column.nullable {
                rules.push(ValidationRule::Required);
            }
        } else if let Some(range) = int_range(&column.raw_type, self.host) {
            rules.extend(range_rule(range, self.host));
        }

        if column.name == self.primary_key {
            rules.push(ValidationRule::FromRouteParameter(self.primary_key.clone()));
        }

        trace!(column = ?column.name, rules = ?rules, "Derived validation rules");
        rules
    }
}

/// First parenthesized integer of a raw column type
fn declared_length(raw_type: &str) -> Option<u64> {
    LENGTH_RE
        .captures(raw_type)
        .and_then(|caps| caps.get(1))
        .and_then(|len| len.as_str().parse().ok())
}

/// Range attribute for bounds tighter than the host integer
fn range_rule(range: IntRange, host: HostInteger) -> Option<ValidationRule> {
    let min_tighter = range.min > host.min();
    let max_tighter = range.max < host.max();

    match (min_tighter, max_tighter) {
        (true, true) => Some(ValidationRule::Between(range.min, range.max)),
        (true, false) => Some(ValidationRule::Min(range.min)),
        (false, true) => Some(ValidationRule::Max(range.max)),
        (false, false) => None,
    }
}
