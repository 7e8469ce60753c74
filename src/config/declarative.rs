//! Declarative binding of resolved fields into caller types.
//!
//! A caller describes its fields explicitly with [`FieldSpec`] (name, kind,
//! list flag, default). [`DeclarativeConfig`] turns each field name into a
//! configuration name, resolves it, and collects the results into a JSON
//! object that `serde` then deserializes into the caller's type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cast::{Cast, CastError, boolean_cast, comma_separated, null_cast, parse, valid_path};

use super::defaults::NAME_SEPARATOR;
use super::{ConfigError, Resolver};

/// Type of a declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Raw string
    #[default]
    Str,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Strict boolean (`true`, `false`, `1`, `0`, empty)
    Bool,
    /// Path that must exist
    Path,
    /// Null marker (`null`, `none`, empty)
    Null,
}

impl FieldKind {
    /// Returns the lowercase spelling used in schema files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Path => "path",
            Self::Null => "null",
        }
    }
}

impl Cast<str> for FieldKind {
    type Output = Value;

    fn cast(&self, input: &str) -> Result<Value, CastError> {
        match self {
            Self::Str => Ok(Value::String(input.to_string())),
            Self::Int => parse::<i64>().cast(input).map(Value::from),
            Self::Float => parse::<f64>().cast(input).map(Value::from),
            Self::Bool => boolean_cast().strict().cast(input).map(Value::Bool),
            Self::Path => valid_path()
                .cast(input)
                .map(|path| Value::String(path.to_string_lossy().into_owned())),
            Self::Null => null_cast::<Value>().cast(input).map(|_| Value::Null),
        }
    }

    fn describe(&self) -> String {
        self.as_str().to_string()
    }
}

/// Explicit description of one field to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Field name, before prefixing and case conversion
    pub name: String,

    /// Value type
    #[serde(default)]
    pub kind: FieldKind,

    /// Parse the value as a comma-separated list of `kind`
    #[serde(default)]
    pub list: bool,

    /// Keep at most this many list items
    pub max_len: Option<usize>,

    /// Value used when the name is absent
    pub default: Option<Value>,
}

impl FieldSpec {
    /// Creates a required scalar field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            list: false,
            max_len: None,
            default: None,
        }
    }

    /// Marks the field as a comma-separated list.
    #[must_use]
    pub const fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Truncates the list to at most `max_len` items.
    #[must_use]
    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Sets the value used when the name is absent.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the cast for this field.
    #[must_use]
    pub const fn cast(&self) -> FieldCast {
        FieldCast {
            kind: self.kind,
            list: self.list,
            max_len: self.max_len,
        }
    }
}

/// Cast derived from a [`FieldSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCast {
    kind: FieldKind,
    list: bool,
    max_len: Option<usize>,
}

impl Cast<str> for FieldCast {
    type Output = Value;

    fn cast(&self, input: &str) -> Result<Value, CastError> {
        if !self.list {
            return self.kind.cast(input);
        }
        let mut items = comma_separated(self.kind).cast(input)?;
        if let Some(max_len) = self.max_len {
            items.truncate(max_len);
        }
        Ok(Value::Array(items))
    }

    fn describe(&self) -> String {
        if self.list {
            format!("{} sequence", self.kind.as_str())
        } else {
            self.kind.describe()
        }
    }
}

/// Case conversion applied to configuration names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// `APP_PORT`
    #[default]
    Upper,
    /// `app_port`
    Lower,
    /// Leave the name as written
    Preserve,
}

impl NameCase {
    /// Applies the conversion.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Upper => name.to_uppercase(),
            Self::Lower => name.to_lowercase(),
            Self::Preserve => name.to_string(),
        }
    }
}

/// Naming and default rules for declarative binding.
///
/// # Examples
///
/// ```
/// use envcast::config::{Config, DeclarativeConfig, FieldKind, FieldSpec};
/// use envcast::source::EnvMapping;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Server {
///     port: i64,
///     debug: bool,
/// }
///
/// let config = Config::with_mapping(EnvMapping::new([("APP_PORT", "8080"), ("DEBUG", "1")]));
/// let decl = DeclarativeConfig {
///     prefix: "app".to_string(),
///     no_prefix: vec!["debug".to_string()],
///     ..DeclarativeConfig::default()
/// };
///
/// let server: Server = decl
///     .bind(&config, &[
///         FieldSpec::new("port", FieldKind::Int),
///         FieldSpec::new("debug", FieldKind::Bool),
///     ])
///     .unwrap();
/// assert_eq!(server.port, 8080);
/// assert!(server.debug);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarativeConfig {
    /// Prepended to field names, joined with `_`
    pub prefix: String,
    /// Fields that never get the prefix
    pub no_prefix: Vec<String>,
    /// Case conversion applied after prefixing
    pub case: NameCase,
    /// Fallback defaults by field name
    pub defaults: Map<String, Value>,
}

impl DeclarativeConfig {
    /// Returns the configuration name for `field`.
    #[must_use]
    pub fn env_name(&self, field: &str) -> String {
        if self.prefix.is_empty() || self.no_prefix.iter().any(|n| n == field) {
            return self.case.apply(field);
        }
        self.case
            .apply(&[self.prefix.as_str(), field].join(NAME_SEPARATOR))
    }

    /// Resolves one field.
    ///
    /// When the name is absent the field's own default is used, then the
    /// `defaults` entry for the field.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingName`] if the name is absent and has no default
    /// - [`ConfigError::InvalidCast`] if the value does not match the field kind
    pub fn resolve_field(
        &self,
        config: &impl Resolver,
        field: &FieldSpec,
    ) -> Result<Value, ConfigError> {
        let name = self.env_name(&field.name);
        match config.get(&name, field.cast()) {
            Err(e) if e.is_missing() => field
                .default
                .clone()
                .or_else(|| self.defaults.get(&field.name).cloned())
                .ok_or(e),
            result => result,
        }
    }

    /// Resolves every field into a JSON object keyed by field name.
    ///
    /// # Errors
    ///
    /// Returns the first field failure; see [`DeclarativeConfig::resolve_field`].
    pub fn resolve_fields(
        &self,
        config: &impl Resolver,
        fields: &[FieldSpec],
    ) -> Result<Map<String, Value>, ConfigError> {
        fields
            .iter()
            .map(|field| Ok((field.name.clone(), self.resolve_field(config, field)?)))
            .collect()
    }

    /// Resolves every field and deserializes the result into `T`.
    ///
    /// # Errors
    ///
    /// - Any error from [`DeclarativeConfig::resolve_fields`]
    /// - [`ConfigError::Bind`] if the values do not fit `T`
    pub fn bind<T: DeserializeOwned>(
        &self,
        config: &impl Resolver,
        fields: &[FieldSpec],
    ) -> Result<T, ConfigError> {
        let values = self.resolve_fields(config, fields)?;
        Ok(serde_json::from_value(Value::Object(values))?)
    }
}
