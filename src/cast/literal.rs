//! Literal matching cast.

use std::fmt;

use super::boolean::{is_null_marker, lookup_bool};
use super::{Cast, CastError};

/// A literal candidate accepted by [`literal_cast`].
///
/// Candidates may be of mixed kinds; each kind decides how the raw string is
/// compared against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Integer, compared after parsing the trimmed input.
    Int(i64),
    /// String, compared verbatim.
    Str(String),
    /// Byte string, compared against the UTF-8 bytes of the input.
    Bytes(Vec<u8>),
    /// Boolean, compared through the strict boolean cast.
    Bool(bool),
    /// Null, matched by the null markers.
    Null,
    /// Enumeration member, matched by its value.
    Member {
        /// Name of the enumeration
        owner: String,
        /// Name of the member
        name: String,
        /// Value the member is spelled as in configuration
        value: String,
    },
}

impl Literal {
    /// Creates an enumeration member candidate.
    #[must_use]
    pub fn member(
        owner: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Member {
            owner: owner.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns `true` if `raw`, cast to this candidate's kind, equals it.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Int(expected) => raw.trim().parse::<i64>().is_ok_and(|n| n == *expected),
            Self::Str(expected) => raw == expected,
            Self::Bytes(expected) => raw.as_bytes() == expected.as_slice(),
            Self::Bool(expected) => lookup_bool(raw) == Some(*expected),
            Self::Null => is_null_marker(raw),
            Self::Member { value, .. } => raw == value,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Member { owner, name, .. } => write!(f, "{owner}.{name}"),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&[u8]> for Literal {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Cast resolving a raw string to one of a fixed set of literals.
#[derive(Debug, Clone)]
pub struct LiteralCast {
    candidates: Vec<Literal>,
}

/// Returns a cast accepting exactly the given literals.
///
/// Candidates are tried in declaration order and the first match wins, so
/// `[Int(1), Bool(true)]` resolves `"1"` to `Int(1)`.
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, Literal, literal_cast};
///
/// let cast = literal_cast([Literal::Int(1), Literal::from("other"), Literal::Null]);
/// assert_eq!(cast.cast("1").unwrap(), Literal::Int(1));
/// assert_eq!(cast.cast("none").unwrap(), Literal::Null);
/// assert!(cast.cast("two").is_err());
/// ```
#[must_use]
pub fn literal_cast(candidates: impl IntoIterator<Item = Literal>) -> LiteralCast {
    LiteralCast {
        candidates: candidates.into_iter().collect(),
    }
}

impl LiteralCast {
    /// Returns the candidates in declaration order.
    #[must_use]
    pub fn candidates(&self) -> &[Literal] {
        &self.candidates
    }
}

impl Cast<str> for LiteralCast {
    type Output = Literal;

    fn cast(&self, input: &str) -> Result<Literal, CastError> {
        self.candidates
            .iter()
            .find(|candidate| candidate.matches(input))
            .cloned()
            .ok_or_else(|| CastError::Literal {
                value: input.to_string(),
                candidates: self.candidates.clone(),
            })
    }

    fn describe(&self) -> String {
        "literal_cast".to_string()
    }
}
