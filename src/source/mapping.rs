//! In-memory mappings with a write-once-after-read guard.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::Source;

/// Attempt to change a key that has already been read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Key '{key}' was already read and cannot be changed")]
pub struct AlreadySet {
    /// The key that was written or removed
    pub key: String,
}

/// Ordered string mapping that freezes keys once they are read.
///
/// Writes and removals of a key that was already looked up fail with
/// [`AlreadySet`]. This keeps every reader of a key seeing the same value,
/// so the mapping cannot be used as mutable shared state.
///
/// # Examples
///
/// ```
/// use envcast::source::{EnvMapping, Source};
///
/// let mut mapping = EnvMapping::default();
/// mapping.insert("PORT", "8080").unwrap();
/// assert_eq!(mapping.get("PORT").as_deref(), Some("8080"));
/// assert!(mapping.insert("PORT", "9090").is_err());
/// ```
#[derive(Debug, Default)]
pub struct EnvMapping {
    values: BTreeMap<String, String>,
    read: Mutex<HashSet<String>>,
}

impl EnvMapping {
    /// Creates a mapping from key/value pairs.
    #[must_use]
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Snapshots the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Inserts a value, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadySet`] if the key has already been read.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, AlreadySet> {
        let key = key.into();
        self.ensure_unread(&key)?;
        Ok(self.values.insert(key, value.into()))
    }

    /// Removes a value, returning it if present.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadySet`] if the key has already been read.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, AlreadySet> {
        self.ensure_unread(key)?;
        Ok(self.values.remove(key))
    }

    /// Returns `true` if the key has been read through [`Source::get`].
    #[must_use]
    pub fn was_read(&self, key: &str) -> bool {
        self.read
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Returns a copy of all key/value pairs without marking them read.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn ensure_unread(&mut self, key: &str) -> Result<(), AlreadySet> {
        let read = self.read.get_mut().unwrap_or_else(PoisonError::into_inner);
        if read.contains(key) {
            return Err(AlreadySet {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl Source for EnvMapping {
    fn get(&self, name: &str) -> Option<String> {
        self.read
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
        self.values.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read: Mutex::default(),
        }
    }
}

/// [`EnvMapping`] that lower-cases every key on insert and lookup.
#[derive(Debug, Default)]
pub struct LowerEnvMapping {
    inner: EnvMapping,
}

impl LowerEnvMapping {
    /// Creates a case-folding mapping from key/value pairs.
    #[must_use]
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Snapshots the process environment with lower-cased names.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EnvMapping::from_env().snapshot())
    }

    /// Inserts a value under the lower-cased key.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadySet`] if the key has already been read.
    pub fn insert(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, AlreadySet> {
        self.inner.insert(key.to_lowercase(), value)
    }

    /// Removes the value under the lower-cased key.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadySet`] if the key has already been read.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, AlreadySet> {
        self.inner.remove(&key.to_lowercase())
    }

    /// Returns a copy of all (lower-cased) key/value pairs.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.snapshot()
    }
}

impl Source for LowerEnvMapping {
    fn get(&self, name: &str) -> Option<String> {
        self.inner.get(&name.to_lowercase())
    }
}
