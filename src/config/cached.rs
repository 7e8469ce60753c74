//! Resolver that memoizes the first successful resolution per name.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cast::{Cast, identity};

use super::{Config, ConfigError, Fallback, Missing, Resolver};

/// A memoized resolution.
struct CachedEntry {
    /// Identity of the cast that produced the value
    cast: String,
    value: Box<dyn Any + Send + Sync>,
}

/// Resolver that replays the first successful resolution of each name.
///
/// Once a name resolved (through the cast or a default), later calls for it
/// ignore their cast and default and return the cached value. Asking for the
/// cached name with a different output type is a
/// [`ConfigError::CacheConflict`].
///
/// The cache lock is not held while casting, so concurrent first calls for
/// the same name may each cast; the last one to finish is kept.
///
/// # Examples
///
/// ```
/// use envcast::cast::{identity, named};
/// use envcast::config::{CachedConfig, Config};
/// use envcast::source::EnvMapping;
///
/// let config = CachedConfig::new(Config::with_mapping(EnvMapping::new([("KEY", "Value")])));
///
/// let first = config.get("KEY", identity()).unwrap();
/// let second = config
///     .get("KEY", named("upper", |s: &str| Ok::<_, std::convert::Infallible>(s.to_uppercase())))
///     .unwrap();
/// assert_eq!(first, "Value");
/// assert_eq!(second, "Value");
/// ```
pub struct CachedConfig<R = Config> {
    inner: R,
    cache: Mutex<HashMap<String, CachedEntry>>,
}

impl<R: Resolver> CachedConfig<R> {
    /// Wraps a resolver with a per-name cache.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::default(),
        }
    }

    /// Resolves `name`, or replays its cached value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::CacheConflict`] if the cached value has another type
    /// - otherwise as [`Resolver::resolve`]; failures are not cached
    pub fn resolve<C>(
        &self,
        name: &str,
        cast: C,
        fallback: impl Into<Fallback<C::Output>>,
    ) -> Result<C::Output, ConfigError>
    where
        C: Cast,
        C::Output: Clone + Send + Sync + 'static,
    {
        if let Some(entry) = self.entries().get(name) {
            tracing::debug!(name, cast = %entry.cast, "Replaying cached resolution");
            return entry
                .value
                .downcast_ref::<C::Output>()
                .cloned()
                .ok_or_else(|| ConfigError::CacheConflict {
                    name: name.to_string(),
                    cached: entry.cast.clone(),
                    requested: std::any::type_name::<C::Output>(),
                });
        }

        let cast_name = cast.describe();
        let value = self.inner.resolve(name, cast, fallback)?;
        self.entries().insert(
            name.to_string(),
            CachedEntry {
                cast: cast_name,
                value: Box::new(value.clone()),
            },
        );
        Ok(value)
    }

    /// Resolves a required name through the cache.
    ///
    /// # Errors
    ///
    /// See [`CachedConfig::resolve`].
    pub fn get<C>(&self, name: &str, cast: C) -> Result<C::Output, ConfigError>
    where
        C: Cast,
        C::Output: Clone + Send + Sync + 'static,
    {
        self.resolve(name, cast, Missing)
    }

    /// Resolves a name through the cache, defaulting when absent.
    ///
    /// # Errors
    ///
    /// See [`CachedConfig::resolve`].
    pub fn get_or<C>(&self, name: &str, cast: C, default: C::Output) -> Result<C::Output, ConfigError>
    where
        C: Cast,
        C::Output: Clone + Send + Sync + 'static,
    {
        self.resolve(name, cast, Fallback::Value(default))
    }

    /// Resolves a required name as its raw string through the cache.
    ///
    /// # Errors
    ///
    /// See [`CachedConfig::resolve`].
    pub fn raw(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name, identity())
    }

    /// Returns `true` if `name` has a cached resolution.
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.entries().contains_key(name)
    }

    /// Drops every cached resolution.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Returns the wrapped resolver.
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedEntry>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for CachedConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .map_or(0, |cache| cache.len());
        f.debug_struct("CachedConfig")
            .field("inner", &self.inner)
            .field("cached", &cached)
            .finish()
    }
}
