//! MySQL column type to PHP type mapping

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{trace, warn};

/// Date-time class used for date, datetime and timestamp columns
pub const CARBON: &str = "Carbon\\Carbon";

/// Raw column type MySQL uses to encode booleans
pub const BOOLEAN_RAW_TYPE: &str = "tinyint(1)";

static INT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(tinyint|smallint|mediumint|int|bigint)(\(\d+\))?( unsigned)?( zerofill)?$")
        .expect("valid integer type pattern")
});

/// PHP type a column maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhpType {
    Int,
    Float,
    Bool,
    String,
    Array,
    /// `Carbon\Carbon`, must be imported
    DateTime,
}

impl PhpType {
    /// Type expression as written in a property declaration (fully qualified for classes)
    pub fn as_str(self) -> &'static str {
        match self {
            PhpType::Int => "int",
            PhpType::Float => "float",
            PhpType::Bool => "bool",
            PhpType::String => "string",
            PhpType::Array => "array",
            PhpType::DateTime => CARBON,
        }
    }

    /// Whether the type names a class that needs a `use` import
    pub fn is_external(self) -> bool {
        matches!(self, PhpType::DateTime)
    }
}

/// Whether a raw column type is the boolean encoding
pub fn is_boolean_column(raw_type: &str) -> bool {
    raw_type.trim().eq_ignore_ascii_case(BOOLEAN_RAW_TYPE)
}

/// Lowercase a type keyword and strip any length and trailing modifiers
///
/// `DECIMAL(8,2) unsigned` becomes `decimal`.
pub fn normalize_type_name(type_name: &str) -> String {
    let without_length = type_name.split('(').next().unwrap_or_default();
    without_length
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Map a column to its PHP type
///
/// Unknown types map to `string`.
pub fn map_type(base_type_name: &str, raw_type: &str) -> PhpType {
    if is_boolean_column(raw_type) {
        return PhpType::Bool;
    }

    let mut key = normalize_type_name(base_type_name);
    if key.is_empty() {
        key = normalize_type_name(raw_type);
    }

    let php_type = match key.as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "year" | "bit" => {
            PhpType::Int
        }
        "float" | "double" | "real" | "decimal" | "dec" | "numeric" => PhpType::Float,
        "date" | "datetime" | "timestamp" => PhpType::DateTime,
        "time" => PhpType::String,
        "char" | "varchar" | "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob"
        | "longblob" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" | "set" => {
            PhpType::String
        }
        "geometry" | "point" | "linestring" | "polygon" | "multipoint" | "multilinestring"
        | "multipolygon" | "geometrycollection" => PhpType::String,
        "json" => PhpType::Array,
        _ => {
            warn!(type_name = ?base_type_name, raw_type = ?raw_type, "Unknown column type, using string");
            PhpType::String
        }
    };

    trace!(type_name = ?key, php_type = ?php_type, "Mapped column type");
    php_type
}

/// Integer type of the PHP runtime the generated code targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum HostInteger {
    #[default]
    Int32,
    Int64,
}

impl HostInteger {
    pub fn min(self) -> i64 {
        match self {
            HostInteger::Int32 => i64::from(i32::MIN),
            HostInteger::Int64 => i64::MIN,
        }
    }

    pub fn max(self) -> i64 {
        match self {
            HostInteger::Int32 => i64::from(i32::MAX),
            HostInteger::Int64 => i64::MAX,
        }
    }
}

impl TryFrom<u32> for HostInteger {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(HostInteger::Int32),
            64 => Ok(HostInteger::Int64),
            other => Err(format!("host integer width must be 32 or 64, got {other}")),
        }
    }
}

/// Inclusive value range of an integer column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

/// Value range of a MySQL integer column type, `None` for anything else
///
/// `BIGINT UNSIGNED` is capped at the host integer maximum.
pub fn int_range(raw_type: &str, host: HostInteger) -> Option<IntRange> {
    let caps = INT_TYPE_RE.captures(raw_type.trim())?;
    let unsigned = caps.get(3).is_some();
    let keyword = caps.get(1)?.as_str().to_lowercase();

    let (min, max) = match (keyword.as_str(), unsigned) {
        ("tinyint", false) => (-128, 127),
        ("tinyint", true) => (0, 255),
        ("smallint", false) => (-32_768, 32_767),
        ("smallint", true) => (0, 65_535),
        ("mediumint", false) => (-8_388_608, 8_388_607),
        ("mediumint", true) => (0, 16_777_215),
        ("int", false) => (-2_147_483_648, 2_147_483_647),
        ("int", true) => (0, 4_294_967_295),
        ("bigint", false) => (i64::MIN, i64::MAX),
        ("bigint", true) => (0, host.max()),
        _ => return None,
    };

    Some(IntRange { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_detection_ignores_base_type() {
        assert_eq!(map_type("tinyint", "tinyint(1)"), PhpType::Bool);
        assert_eq!(map_type("whatever", "TINYINT(1)"), PhpType::Bool);
        assert_eq!(map_type("tinyint", "tinyint(4)"), PhpType::Int);
        assert_eq!(map_type("tinyint", "tinyint(1) unsigned"), PhpType::Int);
    }

    #[test]
    fn test_map_type_families() {
        assert_eq!(map_type("bigint", "bigint unsigned"), PhpType::Int);
        assert_eq!(map_type("decimal", "decimal(8,2)"), PhpType::Float);
        assert_eq!(map_type("timestamp", "timestamp"), PhpType::DateTime);
        assert_eq!(map_type("time", "time"), PhpType::String);
        assert_eq!(map_type("varchar", "varchar(255)"), PhpType::String);
        assert_eq!(map_type("longtext", "longtext"), PhpType::String);
        assert_eq!(map_type("point", "point"), PhpType::String);
        assert_eq!(map_type("json", "json"), PhpType::Array);
    }

    #[test]
    fn test_map_type_normalizes_base_type() {
        assert_eq!(map_type("INT(11) UNSIGNED", "int(11) unsigned"), PhpType::Int);
        assert_eq!(map_type("", "datetime(6)"), PhpType::DateTime);
    }

    #[test]
    fn test_unknown_type_defaults_to_string() {
        assert_eq!(map_type("uuid", "uuid"), PhpType::String);
        assert_eq!(map_type("", ""), PhpType::String);
    }

    #[test]
    fn test_datetime_is_external() {
        assert!(PhpType::DateTime.is_external());
        assert_eq!(PhpType::DateTime.as_str(), CARBON);
        assert!(!PhpType::Int.is_external());
    }

    #[test]
    fn test_int_range_signed_and_unsigned() {
        let host = HostInteger::Int64;
        assert_eq!(
            int_range("tinyint(3) unsigned", host),
            Some(IntRange { min: 0, max: 255 })
        );
        assert_eq!(
            int_range("smallint", host),
            Some(IntRange { min: -32_768, max: 32_767 })
        );
        assert_eq!(
            int_range("MEDIUMINT(8) UNSIGNED", host),
            Some(IntRange { min: 0, max: 16_777_215 })
        );
        assert_eq!(
            int_range("int(10) unsigned zerofill", host),
            Some(IntRange { min: 0, max: 4_294_967_295 })
        );
    }

    #[test]
    fn test_int_range_bigint_unsigned_uses_host_max() {
        assert_eq!(
            int_range("bigint unsigned", HostInteger::Int64),
            Some(IntRange { min: 0, max: i64::MAX })
        );
        assert_eq!(
            int_range("bigint unsigned", HostInteger::Int32),
            Some(IntRange { min: 0, max: i64::from(i32::MAX) })
        );
    }

    #[test]
    fn test_int_range_rejects_non_integers() {
        assert_eq!(int_range("varchar(20)", HostInteger::Int64), None);
        assert_eq!(int_range("integer", HostInteger::Int64), None);
        assert_eq!(int_range("int(11) signed", HostInteger::Int64), None);
    }

    #[test]
    fn test_host_integer_from_bits() {
        assert_eq!(HostInteger::try_from(32), Ok(HostInteger::Int32));
        assert_eq!(HostInteger::try_from(64), Ok(HostInteger::Int64));
        assert!(HostInteger::try_from(16).is_err());
    }

    #[test]
    fn test_normalize_type_name() {
        assert_eq!(normalize_type_name("DECIMAL(8,2) unsigned"), "decimal");
        assert_eq!(normalize_type_name("bigint unsigned"), "bigint");
    }
}
