//! Conditional resolver: secondary sources consulted only when a gate allows.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::cast::parse;
use crate::source::{EnvFile, EnvMapping, Source};

use super::defaults::{ENV_VAR, MAX_RELEVANCY};
use super::{Config, ConfigError, Env, Resolver};

/// Per-name predicate deciding whether gated sources may answer.
pub trait Validator: Send + Sync {
    /// Returns `true` if gated sources may be consulted for `name`.
    fn validate(&self, name: &str) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, name: &str) -> bool {
        self(name)
    }
}

/// A secondary source with its own gate.
struct GatedSource<V> {
    file: EnvFile,
    validator: V,
    /// Verdicts already computed, by name
    verdicts: Mutex<HashMap<String, bool>>,
}

impl<V: Validator> GatedSource<V> {
    fn allows(&self, name: &str) -> bool {
        let mut verdicts = self.verdicts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&allowed) = verdicts.get(name) {
            return allowed;
        }
        let allowed = self.validator.validate(name);
        verdicts.insert(name.to_string(), allowed);
        allowed
    }
}

/// Resolver over a primary source plus gated secondary sources.
///
/// A name is first looked up in the primary resolver. When absent, each gated
/// source is tried in the order it was added, but only if its validator
/// approves the name. Each validator runs at most once per name.
pub struct OptionalConfig<V> {
    primary: Config,
    gated: Vec<GatedSource<V>>,
}

impl<V: Validator> OptionalConfig<V> {
    /// Creates a conditional resolver with no gated sources yet.
    #[must_use]
    pub const fn new(primary: Config) -> Self {
        Self {
            primary,
            gated: Vec::new(),
        }
    }

    /// Creates a conditional resolver whose validator is derived from
    /// `primary` before any lookup happens.
    ///
    /// `validator` typically reads a relevancy value (an environment, a
    /// feature flag) and returns the gate built from it. Every file in
    /// `files` is gated by its own copy of that validator.
    ///
    /// # Errors
    ///
    /// Returns whatever `validator` fails with, usually
    /// [`ConfigError::MissingName`] or [`ConfigError::InvalidCast`].
    ///
    /// # Examples
    ///
    /// ```
    /// use envcast::cast::boolean_cast;
    /// use envcast::config::{Config, OptionalConfig, Resolver};
    /// use envcast::source::{EnvFile, EnvMapping};
    ///
    /// let primary = Config::with_mapping(EnvMapping::new([("USE_LOCAL_SECRETS", "yes")]));
    /// let files = [EnvFile::parse("TOKEN=dev-token\n")];
    /// let config = OptionalConfig::from_relevancy(primary, files, |cfg: &Config| {
    ///     let enabled = cfg.get("USE_LOCAL_SECRETS", boolean_cast().strict())?;
    ///     Ok(move |_: &str| enabled)
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.raw("TOKEN").unwrap(), "dev-token");
    /// ```
    pub fn from_relevancy<F>(
        primary: Config,
        files: impl IntoIterator<Item = EnvFile>,
        validator: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Config) -> Result<V, ConfigError>,
        V: Clone,
    {
        let validator = validator(&primary)?;
        Ok(files
            .into_iter()
            .fold(Self::new(primary), |config, file| {
                config.with_gated(file, validator.clone())
            }))
    }

    /// Adds a secondary source consulted when `validator` approves.
    #[must_use]
    pub fn with_gated(mut self, file: EnvFile, validator: V) -> Self {
        self.gated.push(GatedSource {
            file,
            validator,
            verdicts: Mutex::default(),
        });
        self
    }

    /// Returns the primary resolver.
    #[must_use]
    pub const fn primary(&self) -> &Config {
        &self.primary
    }

    /// Returns the validators in consultation order.
    pub fn validators(&self) -> impl Iterator<Item = &V> {
        self.gated.iter().map(|source| &source.validator)
    }
}

impl<V: Validator> Resolver for OptionalConfig<V> {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.primary.lookup(name) {
            return Some(value);
        }

        for source in &self.gated {
            if !source.allows(name) {
                tracing::debug!(name, file = ?source.file.path(), "Gated source skipped");
                continue;
            }
            if let Some(value) = source.file.get(name) {
                tracing::debug!(name, file = ?source.file.path(), "Name found in gated source");
                return Some(value);
            }
        }
        None
    }
}

impl<V> fmt::Debug for OptionalConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalConfig")
            .field("primary", &self.primary)
            .field(
                "gated",
                &self.gated.iter().map(|s| s.file.path()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Relevancy gating
// ============================================================================

/// Validator that opens when the current environment is at most `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevancyGate {
    env: Env,
    max: Env,
}

impl RelevancyGate {
    /// Creates a gate for the current environment `env`.
    #[must_use]
    pub const fn new(env: Env, max: Env) -> Self {
        Self { env, max }
    }

    /// Returns the current environment.
    #[must_use]
    pub const fn env(&self) -> Env {
        self.env
    }

    /// Returns the most sensitive environment the gate opens for.
    #[must_use]
    pub const fn max(&self) -> Env {
        self.max
    }
}

impl Validator for RelevancyGate {
    fn validate(&self, _name: &str) -> bool {
        self.env.rank() <= self.max.rank()
    }
}

/// Resolves the current environment from `config`.
///
/// # Errors
///
/// - [`ConfigError::MissingName`] if `env_var` is not set
/// - [`ConfigError::InvalidCast`] if its value is not a known environment
pub fn relevancy(config: &impl Resolver, env_var: &str) -> Result<Env, ConfigError> {
    config.get(env_var, parse::<Env>())
}

/// A `.env` file that is only read in environments up to `max_env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotFile {
    /// Path to the file; a missing file contributes no values
    pub path: PathBuf,
    /// Most sensitive environment the file applies to
    pub max_env: Env,
}

impl DotFile {
    /// Creates a dot-file entry gated at the default maximum relevancy.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_env: MAX_RELEVANCY,
        }
    }

    /// Sets the most sensitive environment the file applies to.
    #[must_use]
    pub const fn max_env(mut self, max_env: Env) -> Self {
        self.max_env = max_env;
        self
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolver whose dot-files are gated by deployment environment.
///
/// The current environment is read from the primary mapping at construction
/// (`CONFIG_ENV` unless another variable is given). Construction fails if it
/// is absent or invalid. Afterwards each dot-file is consulted only when the
/// current environment ranks at most the file's `max_env`.
///
/// # Examples
///
/// ```
/// use envcast::config::{DotFile, Env, EnvConfig, Resolver};
/// use envcast::source::EnvMapping;
///
/// let mapping = EnvMapping::new([("CONFIG_ENV", "prd"), ("HOST", "db.internal")]);
/// let config = EnvConfig::new(mapping, [DotFile::new("does-not-exist.env")]).unwrap();
///
/// assert_eq!(config.env(), Env::Prd);
/// assert_eq!(config.raw("HOST").unwrap(), "db.internal");
/// ```
#[derive(Debug)]
pub struct EnvConfig {
    inner: OptionalConfig<RelevancyGate>,
    env: Env,
}

impl EnvConfig {
    /// Creates a resolver reading the environment from `CONFIG_ENV`.
    ///
    /// # Errors
    ///
    /// See [`EnvConfig::with_env_var`].
    pub fn new(
        mapping: impl Source + 'static,
        dotfiles: impl IntoIterator<Item = DotFile>,
    ) -> Result<Self, ConfigError> {
        Self::with_env_var(ENV_VAR, mapping, dotfiles)
    }

    /// Creates a resolver over the process environment.
    ///
    /// # Errors
    ///
    /// See [`EnvConfig::with_env_var`].
    pub fn from_env(dotfiles: impl IntoIterator<Item = DotFile>) -> Result<Self, ConfigError> {
        Self::new(EnvMapping::from_env(), dotfiles)
    }

    /// Creates a resolver reading the environment from `env_var`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingName`] if `env_var` is not in the mapping
    /// - [`ConfigError::InvalidCast`] if its value is not a known environment
    /// - [`ConfigError::FileRead`] if a dot-file exists but cannot be read
    pub fn with_env_var(
        env_var: &str,
        mapping: impl Source + 'static,
        dotfiles: impl IntoIterator<Item = DotFile>,
    ) -> Result<Self, ConfigError> {
        Self::from_primary(Config::with_mapping(mapping), env_var, dotfiles)
    }

    /// Creates a resolver over an existing primary resolver.
    ///
    /// The environment is resolved from `primary`, including its `.env`
    /// values, which are never gated.
    ///
    /// # Errors
    ///
    /// See [`EnvConfig::with_env_var`].
    pub fn from_primary(
        primary: Config,
        env_var: &str,
        dotfiles: impl IntoIterator<Item = DotFile>,
    ) -> Result<Self, ConfigError> {
        let env = relevancy(&primary, env_var)?;
        tracing::debug!(env = %env, env_var, "Resolved relevancy");

        let mut inner = OptionalConfig::new(primary);
        for dotfile in dotfiles {
            let file = EnvFile::load(&dotfile.path)?;
            inner = inner.with_gated(file, RelevancyGate::new(env, dotfile.max_env));
        }
        Ok(Self { inner, env })
    }

    /// Returns the current environment.
    #[must_use]
    pub const fn env(&self) -> Env {
        self.env
    }
}

impl Resolver for EnvConfig {
    fn lookup(&self, name: &str) -> Option<String> {
        self.inner.lookup(name)
    }
}
