//! Case-insensitive resolver.

use crate::source::{EnvFile, LowerEnvMapping};

use super::{Config, Resolver};

/// Resolver that ignores the case of names.
///
/// Keys are stored lower-cased and names are lower-cased before lookup, so
/// `DATABASE_URL`, `database_url` and `Database_Url` all resolve alike.
#[derive(Debug)]
pub struct CiConfig {
    inner: Config,
}

impl CiConfig {
    /// Creates a case-insensitive resolver over the given mapping.
    #[must_use]
    pub fn new(mapping: LowerEnvMapping) -> Self {
        Self {
            inner: Config::with_mapping(mapping),
        }
    }

    /// Creates a case-insensitive resolver over the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LowerEnvMapping::from_env())
    }

    /// Uses `file` as the secondary source, folding its keys.
    #[must_use]
    pub fn with_file(self, file: EnvFile) -> Self {
        Self {
            inner: self.inner.with_file(file.lowercased()),
        }
    }
}

impl Resolver for CiConfig {
    fn lookup(&self, name: &str) -> Option<String> {
        self.inner.lookup(&name.to_lowercase())
    }
}
