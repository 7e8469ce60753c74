//! Command execution logic.
//!
//! This module builds the resolver a command asks for, resolves the
//! requested names, and renders the typed result as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use envcast::cast::{Cast, CastError};
use envcast::config::{
    CiConfig, Config, ConfigError, DotFile, EnvConfig, Fallback, FieldKind, FieldSpec, GetArgs,
    Resolver, Schema,
};
use envcast::source::{EnvFile, EnvMapping, LowerEnvMapping};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Resolution failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The `--default` value does not satisfy the requested cast.
    #[error("Invalid --default '{value}' for {cast}: {source}")]
    InvalidDefault {
        /// The rejected default
        value: String,
        /// Identity of the requested cast
        cast: String,
        /// Underlying cast failure
        #[source]
        source: CastError,
    },

    /// Failed to render the result.
    #[error("Failed to render output: {0}")]
    Render(#[source] serde_json::Error),
}

impl RunError {
    /// Returns true if the error stems from invalid arguments.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidDefault { .. })
    }
}

/// Executes the `get` command against the given environment snapshot.
///
/// The resolver is chosen from the arguments:
/// - gated files: [`EnvConfig`] over the environment and the `.env` file
/// - `--ignore-case`: [`CiConfig`]
/// - otherwise: [`Config`]
///
/// # Errors
///
/// Returns an error if the default is invalid or resolution fails.
pub fn execute_get(args: &GetArgs, env: BTreeMap<String, String>) -> Result<Value, RunError> {
    let mut field = FieldSpec::new(&args.name, FieldKind::from(args.cast));
    field.list = args.list;
    let cast = field.cast();

    let fallback = match &args.default {
        Some(raw) => Fallback::Value(cast.cast(raw.as_str()).map_err(|e| RunError::InvalidDefault {
            value: raw.clone(),
            cast: cast.describe(),
            source: e,
        })?),
        None => Fallback::Missing,
    };

    let file = EnvFile::load(&args.env_file)?;

    let value = if !args.gated_file.is_empty() {
        let dotfiles = args
            .gated_file
            .iter()
            .map(|path| DotFile::new(path).max_env(args.max_env.into()));
        let primary = Config::with_mapping(EnvMapping::new(env)).with_file(file);
        let config = EnvConfig::from_primary(primary, &args.env_var, dotfiles)?;
        tracing::debug!(env = %config.env(), "Using gated resolver");
        config.resolve(&args.name, cast, fallback)?
    } else if args.ignore_case {
        CiConfig::new(LowerEnvMapping::new(env))
            .with_file(file)
            .resolve(&args.name, cast, fallback)?
    } else {
        Config::with_mapping(EnvMapping::new(env))
            .with_file(file)
            .resolve(&args.name, cast, fallback)?
    };

    tracing::debug!(name = %args.name, "Resolved");
    Ok(value)
}

/// Executes the `bind` command against the given environment snapshot.
///
/// # Errors
///
/// Returns an error if the schema cannot be loaded or a field fails.
pub fn execute_bind(
    schema: &Path,
    env_file: &Path,
    env: BTreeMap<String, String>,
) -> Result<Value, RunError> {
    let schema = Schema::load(schema)?;
    let file = EnvFile::load(env_file)?;
    let config = Config::with_mapping(EnvMapping::new(env)).with_file(file);

    let values = schema.declarative().resolve_fields(&config, &schema.fields)?;
    tracing::debug!(fields = values.len(), "Bound schema");
    Ok(Value::Object(values))
}

/// Renders a resolved value for printing.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn render(value: &Value) -> Result<String, RunError> {
    serde_json::to_string_pretty(value).map_err(RunError::Render)
}
