//! Cast functions for turning raw configuration strings into typed values.
//!
//! This module provides:
//! - The [`Cast`] trait every cast implements, plus a blanket impl for closures
//! - Primitive casts ([`boolean_cast`], [`null_cast`], [`literal_cast`], [`valid_path`])
//! - Composite casts ([`comma_separated`], [`joined_cast`], [`multicast`],
//!   [`with_rule`], [`none_is_missing`])
//! - Adapters ([`identity`], [`parse`], [`named`], [`instance_is_casted`])
//!
//! # Design
//!
//! A cast is a pure `&I -> Result<T, CastError>` function. Closures returning
//! any error convertible into a boxed error are casts too, so
//! `|s: &str| s.parse::<u16>()` can be handed to the resolver directly.
//! Composite casts own their inner casts and compose by value.

mod boolean;
mod combinator;
mod error;
mod literal;
mod path;
mod sequence;


use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

pub use boolean::{Boolean, Null, StrictBoolean, boolean_cast, null_cast};
pub use combinator::{
    Chain, Joined, MultiCast, NoneIsMissing, Rule, joined_cast, matches_pattern, multicast,
    none_is_missing, with_rule,
};
pub use error::{BoxError, CastError, InvalidEnv};
pub use literal::{Literal, LiteralCast, literal_cast};
pub use path::{ValidPath, valid_path};
pub use sequence::{CommaSeparated, comma_separated, split_comma_separated};

/// A function from a raw value to a typed value.
///
/// `I` is the input type, `str` for everything read from a source.
/// Implementations must be deterministic; the resolver may call them at most
/// once per lookup and the cached resolver relies on that.
pub trait Cast<I: ?Sized = str> {
    /// Type produced by a successful cast.
    type Output;

    /// Casts the input, or reports why it cannot be cast.
    ///
    /// # Errors
    ///
    /// Returns a [`CastError`] describing the failure.
    fn cast(&self, input: &I) -> Result<Self::Output, CastError>;

    /// Human readable identity of this cast, used in error messages.
    ///
    /// Types casting from more than one input need the qualified form,
    /// e.g. `Cast::<str>::describe(&cast)`.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<I, O, E, F> Cast<I> for F
where
    I: ?Sized,
    F: Fn(&I) -> Result<O, E>,
    E: Into<BoxError>,
{
    type Output = O;

    fn cast(&self, input: &I) -> Result<O, CastError> {
        self(input).map_err(CastError::other)
    }
}

// ============================================================================
// Identity / Parse - adapters for plain strings and FromStr types
// ============================================================================

/// Cast returning the raw string unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

/// Returns the identity cast.
#[must_use]
pub const fn identity() -> Identity {
    Identity
}

impl Cast<str> for Identity {
    type Output = String;

    fn cast(&self, input: &str) -> Result<String, CastError> {
        Ok(input.to_string())
    }

    fn describe(&self) -> String {
        "str".to_string()
    }
}

/// Cast through a type's [`FromStr`] implementation.
pub struct Parse<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Returns a cast that parses the raw string as `T`.
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, parse};
///
/// assert_eq!(parse::<u16>().cast("8080").unwrap(), 8080);
/// assert!(parse::<u16>().cast("eighty").is_err());
/// ```
#[must_use]
pub const fn parse<T>() -> Parse<T> {
    Parse {
        _marker: PhantomData,
    }
}

impl<T> Cast<str> for Parse<T>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    type Output = T;

    fn cast(&self, input: &str) -> Result<T, CastError> {
        input.parse::<T>().map_err(CastError::other)
    }

    fn describe(&self) -> String {
        std::any::type_name::<T>().to_string()
    }
}

impl<T> Clone for Parse<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Parse<T> {}

impl<T> fmt::Debug for Parse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse<{}>", std::any::type_name::<T>())
    }
}

// ============================================================================
// Named - attaches a readable identity to any cast
// ============================================================================

/// Wraps a cast with a human readable label.
#[derive(Debug, Clone)]
pub struct Named<C> {
    label: String,
    inner: C,
}

/// Labels a cast so failure messages name it instead of its Rust type.
#[must_use]
pub fn named<C>(label: impl Into<String>, cast: C) -> Named<C> {
    Named {
        label: label.into(),
        inner: cast,
    }
}

impl<I: ?Sized, C: Cast<I>> Cast<I> for Named<C> {
    type Output = C::Output;

    fn cast(&self, input: &I) -> Result<C::Output, CastError> {
        self.inner.cast(input)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

// ============================================================================
// PassThrough - skip casting for values that are already typed
// ============================================================================

/// A value that is either still raw text or already of the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaybeCast<T> {
    /// Raw text that still needs casting.
    Raw(String),
    /// A value that already has the target type.
    Cast(T),
}

impl<T> From<&str> for MaybeCast<T> {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

/// Adapter returning already typed values unchanged and casting raw ones.
#[derive(Debug, Clone)]
pub struct PassThrough<C> {
    onmiss: C,
}

/// Wraps `onmiss` so that already typed inputs pass through untouched.
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, MaybeCast, boolean_cast, instance_is_casted};
///
/// let cast = instance_is_casted(boolean_cast().strict());
/// assert!(cast.cast(&MaybeCast::Cast(true)).unwrap());
/// assert!(!cast.cast(&MaybeCast::from("0")).unwrap());
/// ```
#[must_use]
pub const fn instance_is_casted<C>(onmiss: C) -> PassThrough<C> {
    PassThrough { onmiss }
}

impl<C> Cast<MaybeCast<C::Output>> for PassThrough<C>
where
    C: Cast<str>,
    C::Output: Clone,
{
    type Output = C::Output;

    fn cast(&self, input: &MaybeCast<C::Output>) -> Result<C::Output, CastError> {
        match input {
            MaybeCast::Cast(value) => Ok(value.clone()),
            MaybeCast::Raw(raw) => self.onmiss.cast(raw.as_str()),
        }
    }

    fn describe(&self) -> String {
        self.onmiss.describe()
    }
}

impl<C: Cast<str>> Cast<str> for PassThrough<C> {
    type Output = C::Output;

    fn cast(&self, input: &str) -> Result<C::Output, CastError> {
        self.onmiss.cast(input)
    }

    fn describe(&self) -> String {
        self.onmiss.describe()
    }
}
