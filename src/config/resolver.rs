//! The value resolver: lookup, default policy and casting.

use std::fmt;

use crate::cast::{Cast, identity};
use crate::source::{EnvFile, EnvMapping, Source};

use super::ConfigError;

/// Marker for "no default supplied".
///
/// Distinct from every real value, including `None`, which is itself a
/// valid cast result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Missing;

/// The "no default" marker.
pub const MISSING: Missing = Missing;

/// What to return when a name has no value.
pub enum Fallback<T> {
    /// No default: absence is an error.
    Missing,
    /// Return this value as is.
    Value(T),
    /// Compute the default only when it is needed.
    Lazy(Box<dyn FnOnce() -> T + Send>),
}

impl<T> Fallback<T> {
    /// Creates a lazily evaluated default.
    #[must_use]
    pub fn lazy(f: impl FnOnce() -> T + Send + 'static) -> Self {
        Self::Lazy(Box::new(f))
    }

    /// Returns `true` if no default was supplied.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Produces the default value, if any.
    fn into_value(self) -> Option<T> {
        match self {
            Self::Missing => None,
            Self::Value(value) => Some(value),
            Self::Lazy(f) => Some(f()),
        }
    }
}

impl<T> From<Missing> for Fallback<T> {
    fn from(_: Missing) -> Self {
        Self::Missing
    }
}

impl<T> fmt::Debug for Fallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Value(_) => f.write_str("Value(..)"),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Applies the default policy and the cast to a looked-up raw value.
///
/// Defaults are returned without casting. Cast failures are wrapped for `name`.
pub(crate) fn finish<C: Cast>(
    name: &str,
    raw: Option<String>,
    cast: &C,
    fallback: Fallback<C::Output>,
) -> Result<C::Output, ConfigError> {
    let Some(raw) = raw else {
        return match fallback.into_value() {
            Some(value) => {
                tracing::debug!(name, "Name not found, using default");
                Ok(value)
            }
            None => Err(ConfigError::missing(name)),
        };
    };

    cast.cast(&raw).map_err(|e| {
        tracing::debug!(name, cast = %cast.describe(), error = %e, "Cast failed");
        ConfigError::from_cast(name, e)
    })
}

/// Read access to named configuration values with typed resolution.
///
/// Implementors only provide [`Resolver::lookup`]; the default methods add
/// the default policy and casting on top.
pub trait Resolver {
    /// Returns the raw value for `name` from the underlying sources.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Resolves `name` with `cast`, falling back to `fallback` when absent.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingName`] if the name is absent and there is no default
    /// - [`ConfigError::InvalidCast`] if the cast rejects the raw value
    fn resolve<C: Cast>(
        &self,
        name: &str,
        cast: C,
        fallback: impl Into<Fallback<C::Output>>,
    ) -> Result<C::Output, ConfigError> {
        finish(name, self.lookup(name), &cast, fallback.into())
    }

    /// Resolves a required name.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    fn get<C: Cast>(&self, name: &str, cast: C) -> Result<C::Output, ConfigError> {
        self.resolve(name, cast, Missing)
    }

    /// Resolves a name, returning `default` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCast`] if the cast rejects the raw value.
    fn get_or<C: Cast>(&self, name: &str, cast: C, default: C::Output) -> Result<C::Output, ConfigError> {
        self.resolve(name, cast, Fallback::Value(default))
    }

    /// Resolves a name, computing the default only when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCast`] if the cast rejects the raw value.
    fn get_or_else<C, F>(&self, name: &str, cast: C, default: F) -> Result<C::Output, ConfigError>
    where
        C: Cast,
        F: FnOnce() -> C::Output + Send + 'static,
    {
        self.resolve(name, cast, Fallback::lazy(default))
    }

    /// Resolves a required name as its raw string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingName`] if the name is absent.
    fn raw(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name, identity())
    }
}

/// Resolver over a primary mapping and an optional `.env` file.
///
/// The mapping is consulted first; the file only when the mapping has no
/// value for the name.
///
/// # Examples
///
/// ```
/// use envcast::cast::parse;
/// use envcast::config::{Config, Resolver};
/// use envcast::source::EnvMapping;
///
/// let config = Config::with_mapping(EnvMapping::new([("PORT", "8080")]));
///
/// assert_eq!(config.get("PORT", parse::<u16>()).unwrap(), 8080);
/// assert_eq!(config.get_or("WORKERS", parse::<u8>(), 4).unwrap(), 4);
/// assert!(config.raw("HOST").unwrap_err().is_missing());
/// ```
pub struct Config {
    mapping: Box<dyn Source>,
    file_values: EnvFile,
}

impl Config {
    /// Creates a resolver over a snapshot of the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_mapping(EnvMapping::from_env())
    }

    /// Creates a resolver over the given mapping.
    #[must_use]
    pub fn with_mapping(mapping: impl Source + 'static) -> Self {
        Self {
            mapping: Box::new(mapping),
            file_values: EnvFile::default(),
        }
    }

    /// Creates a resolver over the process environment and a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn from_env_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_env().with_file(EnvFile::load(path)?))
    }

    /// Uses `file` as the secondary source.
    #[must_use]
    pub fn with_file(mut self, file: EnvFile) -> Self {
        self.file_values = file;
        self
    }

    /// Returns the secondary `.env` source.
    #[must_use]
    pub const fn file_values(&self) -> &EnvFile {
        &self.file_values
    }
}

impl Resolver for Config {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.mapping.get(name) {
            tracing::debug!(name, source = "mapping", "Name found");
            return Some(value);
        }
        let value = self.file_values.get(name);
        if value.is_some() {
            tracing::debug!(name, source = "file", "Name found");
        }
        value
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("file", &self.file_values.path())
            .field("file_entries", &self.file_values.len())
            .finish_non_exhaustive()
    }
}
