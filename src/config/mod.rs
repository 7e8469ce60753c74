//! Configuration resolvers for envcast.
//!
//! This module provides:
//! - The [`Resolver`] trait and the base [`Config`] resolver
//! - Variants: [`CachedConfig`] (memoized) and [`CiConfig`] (case-insensitive)
//! - The conditional resolver ([`OptionalConfig`], [`EnvConfig`]) gated by [`Env`]
//! - Declarative binding ([`DeclarativeConfig`], [`FieldSpec`]) and schema files ([`Schema`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - Default values ([`defaults`])
//!
//! # Resolution
//!
//! A lookup goes through these steps:
//!
//! 1. **Lookup** - the primary mapping, then the `.env` values, then any gated
//!    source whose validator approves the name
//! 2. **Default policy** - an absent name returns the default as is, or fails
//!    with [`ConfigError::MissingName`] when there is none
//! 3. **Cast** - a present value goes through the cast; any failure becomes
//!    [`ConfigError::InvalidCast`] with the cast failure as source
//!
//! Defaults are never cast. A cast reporting [`crate::cast::CastError::Missing`]
//! (see [`crate::cast::none_is_missing`]) is reported as `MissingName`.

mod cached;
mod case;
mod cli;
mod declarative;
pub mod defaults;
mod env;
mod error;
mod gated;
mod resolver;
mod schema;

#[cfg(test)]
mod cached_tests;
#[cfg(test)]
mod case_tests;
#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod gated_tests;
#[cfg(test)]
mod resolver_tests;

pub use cached::CachedConfig;
pub use case::CiConfig;
pub use cli::{CastArg, Cli, Command, EnvArg, GetArgs};
pub use declarative::{DeclarativeConfig, FieldCast, FieldKind, FieldSpec, NameCase};
pub use env::{Env, ParseEnvError};
pub use error::ConfigError;
pub use gated::{DotFile, EnvConfig, OptionalConfig, RelevancyGate, Validator, relevancy};
pub use resolver::{Config, Fallback, MISSING, Missing, Resolver};
pub use schema::{Schema, default_schema_template, write_default_schema};
