//! Configuration loading
//!
//! Generator settings come from an optional TOML file. A .env file is then
//! loaded and `DTOLIFT_*` environment variables override the scalar keys.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use tracing::{debug, error, trace, warn};

use crate::codegen::php::HostInteger;
use crate::prelude::DtoliftError;

/// Code generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Application root namespace
    pub root_namespace: String,
    /// Directory the root namespace maps to
    pub app_path: PathBuf,
    /// Sub-namespace generated classes live under
    pub data_namespace: String,
    /// Fully qualified parent class of generated classes
    pub base_data_class: Option<String>,
    /// Fallback comments keyed by column name
    pub default_column_comment: HashMap<String, String>,
    /// Columns left out of request classes
    pub request_exclude_columns: Vec<String>,
    /// Columns that get no OpenAPI `Property` attribute
    pub schema_exclude_columns: Vec<String>,
    pub primary_key: String,
    /// Whether validation attributes are generated
    pub validation: bool,
    /// Integer width of the target runtime, 32 or 64
    #[serde(rename = "host_integer_bits")]
    pub host_integer: HostInteger,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_namespace: "App".to_string(),
            app_path: PathBuf::from("app"),
            data_namespace: "Data".to_string(),
            base_data_class: None,
            default_column_comment: HashMap::new(),
            request_exclude_columns: Vec::new(),
            schema_exclude_columns: Vec::new(),
            primary_key: "id".to_string(),
            validation: true,
            host_integer: HostInteger::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, DtoliftError> {
        toml::from_str(content).map_err(|e| {
            error!(error = ?e, "Invalid configuration file");
            DtoliftError::Config(format!("Failed to parse configuration: {}", e))
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DtoliftError> {
        debug!(path = ?path, "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|e| {
            error!(path = ?path, error = ?e, "Failed to read configuration file");
            DtoliftError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load the configuration file (if any), then a .env file, then apply
    /// environment overrides
    pub fn load(config_file: Option<&Path>, env_file: &Path) -> Result<Self, DtoliftError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                trace!("No configuration file given, using defaults");
                Self::default()
            }
        };

        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                DtoliftError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        config.with_env_overrides(|key| env::var(key).ok())
    }

    /// Override scalar keys from `DTOLIFT_*` variables
    ///
    /// Expected variables (all optional):
    /// - DTOLIFT_ROOT_NAMESPACE
    /// - DTOLIFT_APP_PATH
    /// - DTOLIFT_BASE_DATA_CLASS (empty clears it)
    /// - DTOLIFT_PRIMARY_KEY
    /// - DTOLIFT_VALIDATION (true/false/1/0)
    /// - DTOLIFT_HOST_INTEGER_BITS (32 or 64)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, DtoliftError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("DTOLIFT_ROOT_NAMESPACE") {
            self.root_namespace = root;
        }

        if let Some(app_path) = lookup("DTOLIFT_APP_PATH") {
            self.app_path = PathBuf::from(app_path);
        }

        if let Some(base) = lookup("DTOLIFT_BASE_DATA_CLASS") {
            self.base_data_class = Some(base).filter(|b| !b.is_empty());
        }

        if let Some(primary_key) = lookup("DTOLIFT_PRIMARY_KEY") {
            self.primary_key = primary_key;
        }

        if let Some(value) = lookup("DTOLIFT_VALIDATION") {
            self.validation = parse_bool(&value).ok_or_else(|| {
                error!(value = ?value, "Invalid DTOLIFT_VALIDATION value");
                DtoliftError::Config("DTOLIFT_VALIDATION must be true or false".to_string())
            })?;
        }

        if let Some(value) = lookup("DTOLIFT_HOST_INTEGER_BITS") {
            let bits = value.parse::<u32>().map_err(|e| {
                error!(value = ?value, error = ?e, "Invalid DTOLIFT_HOST_INTEGER_BITS value");
                DtoliftError::Config("DTOLIFT_HOST_INTEGER_BITS must be 32 or 64".to_string())
            })?;
            self.host_integer = HostInteger::try_from(bits).map_err(DtoliftError::Config)?;
        }

        debug!(config = ?self, "Configuration loaded");
        Ok(self)
    }

    pub fn with_base_data_class(mut self, base_data_class: Option<&str>) -> Self {
        self.base_data_class = base_data_class.map(str::to_string);
        self
    }

    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_host_integer(mut self, host_integer: HostInteger) -> Self {
        self.host_integer = host_integer;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
