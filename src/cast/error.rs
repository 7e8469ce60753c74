//! Error types for cast functions.

use std::path::PathBuf;

use thiserror::Error;

use super::Literal;

/// Boxed error produced by arbitrary user-supplied casts.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a rule check performed by [`with_rule`](super::with_rule).
///
/// Kept as its own type so callers can tell rule violations apart from
/// plain parse failures after the resolver wrapped them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value {value} did not pass rule check {rule}")]
pub struct InvalidEnv {
    /// Name of the rule that rejected the value
    pub rule: String,
    /// The offending value, rendered as text
    pub value: String,
}

/// Error type for cast functions.
///
/// Every cast in this crate reports failure through this type. Errors from
/// user closures are carried in [`CastError::Other`].
#[derive(Debug, Error)]
pub enum CastError {
    /// Input did not match any accepted spelling.
    #[error("Value '{value}' does not match any of: {expected}")]
    NoMatch {
        /// The rejected input
        value: String,
        /// Human readable list of accepted inputs
        expected: &'static str,
    },

    /// Input is not a null marker.
    #[error("Null values should match ('null', 'none', ''), got '{value}'")]
    NotNull {
        /// The rejected input
        value: String,
    },

    /// Input did not match any literal candidate.
    #[error("Value received does not match any argument from literal: {}", format_candidates(.candidates))]
    Literal {
        /// The rejected input
        value: String,
        /// All candidates, in declaration order
        candidates: Vec<Literal>,
    },

    /// Path does not exist on disk.
    #[error("Path {} is not valid path", path.display())]
    PathNotFound {
        /// The path that was checked
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A rule check rejected the value.
    #[error(transparent)]
    Rule(#[from] InvalidEnv),

    /// Both the primary and the fallback cast failed.
    #[error("Value received failed both casts: {first_cast} and {second_cast}: {first} and {second}")]
    BothFailed {
        /// Identity of the primary cast
        first_cast: String,
        /// Identity of the fallback cast
        second_cast: String,
        /// Failure of the primary cast
        first: Box<CastError>,
        /// Failure of the fallback cast
        #[source]
        second: Box<CastError>,
    },

    /// Comma separated input could not be tokenized.
    #[error("Cannot split '{value}': {reason}")]
    Tokenize {
        /// The rejected input
        value: String,
        /// What went wrong
        reason: &'static str,
    },

    /// Cast produced a null-equivalent value that must be reported as missing.
    #[error("{0}")]
    Missing(String),

    /// Error raised by a user-supplied cast.
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl CastError {
    /// Wraps an arbitrary error, unwrapping it if it already is a [`CastError`].
    pub fn other(error: impl Into<BoxError>) -> Self {
        match error.into().downcast::<Self>() {
            Ok(cast) => *cast,
            Err(other) => Self::Other(other),
        }
    }

    /// Returns `true` if the failure should surface as a missing name.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

fn format_candidates(candidates: &[Literal]) -> String {
    let items: Vec<String> = candidates.iter().map(ToString::to_string).collect();
    format!("({})", items.join(", "))
}
