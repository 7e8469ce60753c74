//! Error types for value resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::cast::CastError;

/// Error type for resolver operations.
///
/// Cast failures of any kind surface as [`ConfigError::InvalidCast`] with the
/// original failure as source. Only [`ConfigError::MissingName`] has no cause.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Name has no value in any consulted source and no default was given.
    #[error("Missing required name: {name}")]
    MissingName {
        /// The name that was looked up
        name: String,
    },

    /// The cast function rejected the raw value.
    #[error("Invalid cast for '{name}': {source}")]
    InvalidCast {
        /// The name that was looked up
        name: String,
        /// Underlying cast failure
        #[source]
        source: CastError,
    },

    /// A cached resolution exists for the name but with a different type.
    #[error("Name '{name}' was already resolved by {cached}, cannot return it as {requested}")]
    CacheConflict {
        /// The name that was looked up
        name: String,
        /// Identity of the cast that produced the cached value
        cached: String,
        /// Type requested by the later call
        requested: &'static str,
    },

    /// Failed to read a `.env` or schema file.
    #[error("Failed to read file '{}': {source}", path.display())]
    FileRead {
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a schema file (for init command).
    #[error("Failed to write schema file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the schema file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML schema file.
    #[error("Failed to parse schema: {0}")]
    SchemaParse(#[from] toml::de::Error),

    /// Resolved fields could not be bound to the target type.
    #[error("Failed to bind resolved fields: {0}")]
    Bind(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a `MissingName` error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingName { name: name.into() }
    }

    /// Converts a cast failure for `name` into the resolver taxonomy.
    ///
    /// [`CastError::Missing`] becomes `MissingName`; everything else is
    /// wrapped as `InvalidCast`.
    #[must_use]
    pub fn from_cast(name: impl Into<String>, source: CastError) -> Self {
        if source.is_missing() {
            return Self::missing(name);
        }
        Self::InvalidCast {
            name: name.into(),
            source,
        }
    }

    /// Returns `true` for `MissingName`.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::MissingName { .. })
    }

    /// Returns the cast failure behind an `InvalidCast`.
    #[must_use]
    pub const fn cast_error(&self) -> Option<&CastError> {
        match self {
            Self::InvalidCast { source, .. } => Some(source),
            _ => None,
        }
    }
}
