//! TOML schema files for declarative binding.
//!
//! Defines the structure of the schema file with serde.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ConfigError, DeclarativeConfig, FieldSpec, NameCase};

/// Root structure of a schema file.
///
/// Top-level keys mirror [`DeclarativeConfig`]; each `[[field]]` table is a
/// [`FieldSpec`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Prefix joined to every field name
    #[serde(default)]
    pub prefix: String,

    /// Fields resolved without the prefix
    #[serde(default)]
    pub no_prefix: Vec<String>,

    /// Case conversion: "upper", "lower", or "preserve"
    #[serde(default)]
    pub case: NameCase,

    /// Fallback defaults by field name
    #[serde(default)]
    pub defaults: Map<String, Value>,

    /// Field declarations
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Loads a schema from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses a schema from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Returns the naming and default rules of this schema.
    #[must_use]
    pub fn declarative(&self) -> DeclarativeConfig {
        DeclarativeConfig {
            prefix: self.prefix.clone(),
            no_prefix: self.no_prefix.clone(),
            case: self.case,
            defaults: self.defaults.clone(),
        }
    }
}

/// Generates a commented schema template.
#[must_use]
pub fn default_schema_template() -> String {
    r#"# envcast schema file

# Prefix joined to every field name with "_" (e.g. "app" + "port" -> APP_PORT)
# prefix = "app"

# Fields resolved without the prefix
# no_prefix = ["debug"]

# Case conversion applied to names: "upper" (default), "lower", or "preserve"
# case = "upper"

# Fallback defaults by field name, used when a field has no own default
[defaults]
# workers = 4

# One [[field]] table per value to resolve
# kind: "str" (default), "int", "float", "bool", "path", or "null"
[[field]]
name = "port"
kind = "int"
default = 8080

# [[field]]
# name = "hosts"
# kind = "str"
# list = true
"#
    .to_string()
}

/// Writes the schema template to `path`.
///
/// # Errors
///
/// Returns [`ConfigError::FileWrite`] if the file cannot be written.
pub fn write_default_schema(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, default_schema_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
