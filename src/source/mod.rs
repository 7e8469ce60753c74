//! Mapping sources that the resolver reads raw values from.
//!
//! This module provides:
//! - The [`Source`] trait for string-keyed lookups
//! - [`EnvMapping`], a mapping that refuses changes to keys already read
//! - [`LowerEnvMapping`], a case-folding variant of [`EnvMapping`]
//! - [`EnvFile`], values parsed from a `.env` style file ([`parse_env_file`])

mod dotenv;
mod mapping;


use std::collections::{BTreeMap, HashMap};

pub use dotenv::{EnvFile, parse_env_file};
pub use mapping::{AlreadySet, EnvMapping, LowerEnvMapping};

/// A read-only, string-keyed provider of raw values.
///
/// Implementations must be safe to share across threads; the resolver may
/// be used from several threads as long as the source does not change.
pub trait Source: Send + Sync {
    /// Returns the raw value for `name`, or `None` if it is not present.
    fn get(&self, name: &str) -> Option<String>;
}

impl Source for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        Self::get(self, name).cloned()
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        Self::get(self, name).cloned()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}
