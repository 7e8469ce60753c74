//! Composite casts built from other casts.
//!
//! - [`joined_cast`]: apply casts one after another
//! - [`multicast`]: try a primary cast, fall back to a second one
//! - [`with_rule`]: accept the input unchanged only if a predicate holds
//! - [`none_is_missing`]: report null results as a missing name

use std::fmt::Display;

use regex::Regex;

use super::boolean::is_null_marker;
use super::{Cast, CastError, InvalidEnv};

// ============================================================================
// Joined - cast chaining
// ============================================================================

/// A cast followed by further casts, each applied to the previous result.
#[derive(Debug, Clone)]
pub struct Joined<C> {
    cast: C,
}

/// Two casts applied in sequence.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

/// Starts a cast chain with `cast`.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use envcast::cast::{Cast, joined_cast, parse};
///
/// let cast = joined_cast(parse::<i32>())
///     .then(|n: &i32| Ok::<_, Infallible>(f64::from(*n)))
///     .then(|f: &f64| Ok::<_, Infallible>(format!("{f:?}")));
///
/// assert_eq!(cast.cast("42").unwrap(), "42.0");
/// ```
#[must_use]
pub const fn joined_cast<C>(cast: C) -> Joined<C> {
    Joined { cast }
}

impl<C> Joined<C> {
    /// Appends a cast applied to the output of the chain so far.
    #[must_use]
    pub fn then<G>(self, cast: G) -> Joined<Chain<C, G>> {
        Joined {
            cast: Chain {
                first: self.cast,
                second: cast,
            },
        }
    }
}

impl<I: ?Sized, C: Cast<I>> Cast<I> for Joined<C> {
    type Output = C::Output;

    fn cast(&self, input: &I) -> Result<C::Output, CastError> {
        self.cast.cast(input)
    }

    fn describe(&self) -> String {
        self.cast.describe()
    }
}

impl<I, A, B> Cast<I> for Chain<A, B>
where
    I: ?Sized,
    A: Cast<I>,
    B: Cast<A::Output>,
{
    type Output = B::Output;

    fn cast(&self, input: &I) -> Result<B::Output, CastError> {
        let intermediate = self.first.cast(input)?;
        self.second.cast(&intermediate)
    }

    fn describe(&self) -> String {
        format!("{} -> {}", self.first.describe(), self.second.describe())
    }
}

// ============================================================================
// MultiCast - primary cast with fallback
// ============================================================================

/// A primary cast with a fallback tried when the primary fails.
#[derive(Debug, Clone)]
pub struct MultiCast<A, B> {
    often: A,
    fallback: B,
}

/// Tries `often` first and `fallback` if it fails.
///
/// When both fail, the error names both casts and both failures, and its
/// source is the fallback's failure.
#[must_use]
pub const fn multicast<A, B>(often: A, fallback: B) -> MultiCast<A, B> {
    MultiCast { often, fallback }
}

impl<I, A, B> Cast<I> for MultiCast<A, B>
where
    I: ?Sized,
    A: Cast<I>,
    B: Cast<I, Output = A::Output>,
{
    type Output = A::Output;

    fn cast(&self, input: &I) -> Result<A::Output, CastError> {
        let first = match self.often.cast(input) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        self.fallback
            .cast(input)
            .map_err(|second| CastError::BothFailed {
                first_cast: self.often.describe(),
                second_cast: self.fallback.describe(),
                first: Box::new(first),
                second: Box::new(second),
            })
    }

    fn describe(&self) -> String {
        format!("{} | {}", self.often.describe(), self.fallback.describe())
    }
}

// ============================================================================
// Rule - predicate guarded pass-through
// ============================================================================

/// Cast returning its input unchanged when a named predicate holds.
#[derive(Debug, Clone)]
pub struct Rule<F> {
    name: String,
    rule: F,
}

/// Returns a cast that checks `rule` and yields the input unchanged.
///
/// A rejected value is a [`CastError::Rule`] carrying [`InvalidEnv`].
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, with_rule};
///
/// let cast = with_rule("not_empty", |v: &str| !v.is_empty());
/// assert_eq!(cast.cast("x").unwrap(), "x");
/// assert!(cast.cast("").is_err());
/// ```
#[must_use]
pub fn with_rule<F>(name: impl Into<String>, rule: F) -> Rule<F> {
    Rule {
        name: name.into(),
        rule,
    }
}

/// Returns a rule accepting strings matched by the regex `pattern`.
///
/// # Errors
///
/// Returns an error if the regex pattern is invalid.
pub fn matches_pattern(pattern: &str) -> Result<Rule<impl Fn(&str) -> bool>, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(with_rule(format!("matches /{pattern}/"), move |value: &str| {
        regex.is_match(value)
    }))
}

impl<I, F> Cast<I> for Rule<F>
where
    I: ?Sized + ToOwned + Display,
    F: Fn(&I) -> bool,
{
    type Output = I::Owned;

    fn cast(&self, input: &I) -> Result<I::Owned, CastError> {
        if (self.rule)(input) {
            return Ok(input.to_owned());
        }
        Err(InvalidEnv {
            rule: self.name.clone(),
            value: input.to_string(),
        }
        .into())
    }

    fn describe(&self) -> String {
        format!("rule {}", self.name)
    }
}

// ============================================================================
// NoneIsMissing - null results become missing names
// ============================================================================

/// Wraps a cast yielding `Option<T>` so that null results are missing.
#[derive(Debug, Clone)]
pub struct NoneIsMissing<C> {
    inner: C,
}

/// Reports `None` results, null markers and absent inputs as missing.
///
/// The resolver turns the resulting [`CastError::Missing`] into a
/// missing-name error instead of a cast failure.
#[must_use]
pub const fn none_is_missing<C>(cast: C) -> NoneIsMissing<C> {
    NoneIsMissing { inner: cast }
}

impl<C, T> NoneIsMissing<C>
where
    C: Cast<str, Output = Option<T>>,
{
    fn missing(&self) -> CastError {
        CastError::Missing(format!(
            "Expected value to be castable to {}, but returned None instead",
            self.inner.describe()
        ))
    }
}

impl<C, T> Cast<str> for NoneIsMissing<C>
where
    C: Cast<str, Output = Option<T>>,
{
    type Output = T;

    fn cast(&self, input: &str) -> Result<T, CastError> {
        match self.inner.cast(input) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(self.missing()),
            Err(_) if is_null_marker(input) => Err(self.missing()),
            Err(first) => Err(CastError::BothFailed {
                first_cast: self.inner.describe(),
                second_cast: "null_cast".to_string(),
                first: Box::new(first),
                second: Box::new(CastError::NotNull {
                    value: input.to_string(),
                }),
            }),
        }
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

impl<C, T> Cast<Option<String>> for NoneIsMissing<C>
where
    C: Cast<str, Output = Option<T>>,
{
    type Output = T;

    fn cast(&self, input: &Option<String>) -> Result<T, CastError> {
        match input {
            Some(raw) => Cast::<str>::cast(self, raw),
            None => Err(self.missing()),
        }
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
