//! Boolean and null casts.

use std::fmt;
use std::marker::PhantomData;

use super::{Cast, CastError, MaybeCast};

const BOOL_SPELLINGS: &str = "'true', 'false', '1', '0', ''";

/// Looks up the boolean meaning of a string, ignoring ASCII case.
pub(crate) fn lookup_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Lenient boolean cast: yields `None` when the input is not a boolean spelling.
///
/// Use [`Boolean::strict`] to turn a non-match into a [`CastError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

/// Strict boolean cast: a non-match is a [`CastError::NoMatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictBoolean;

/// Returns the lenient boolean cast.
///
/// `true`/`1` map to `true`; `false`/`0`/empty map to `false`, case-insensitively.
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, boolean_cast};
///
/// assert_eq!(boolean_cast().cast("TRUE").unwrap(), Some(true));
/// assert_eq!(boolean_cast().cast("yes").unwrap(), None);
/// assert!(boolean_cast().strict().cast("yes").is_err());
/// ```
#[must_use]
pub const fn boolean_cast() -> Boolean {
    Boolean
}

impl Boolean {
    /// Returns the strict form of this cast.
    #[must_use]
    pub const fn strict(self) -> StrictBoolean {
        StrictBoolean
    }
}

impl Cast<str> for Boolean {
    type Output = Option<bool>;

    fn cast(&self, input: &str) -> Result<Option<bool>, CastError> {
        Ok(lookup_bool(input))
    }

    fn describe(&self) -> String {
        "boolean_cast".to_string()
    }
}

impl Cast<MaybeCast<bool>> for Boolean {
    type Output = Option<bool>;

    fn cast(&self, input: &MaybeCast<bool>) -> Result<Option<bool>, CastError> {
        match input {
            MaybeCast::Cast(value) => Ok(Some(*value)),
            MaybeCast::Raw(raw) => Ok(lookup_bool(raw)),
        }
    }

    fn describe(&self) -> String {
        Cast::<str>::describe(self)
    }
}

impl Cast<str> for StrictBoolean {
    type Output = bool;

    fn cast(&self, input: &str) -> Result<bool, CastError> {
        lookup_bool(input).ok_or_else(|| CastError::NoMatch {
            value: input.to_string(),
            expected: BOOL_SPELLINGS,
        })
    }

    fn describe(&self) -> String {
        "boolean_cast.strict".to_string()
    }
}

impl Cast<MaybeCast<bool>> for StrictBoolean {
    type Output = bool;

    fn cast(&self, input: &MaybeCast<bool>) -> Result<bool, CastError> {
        match input {
            MaybeCast::Cast(value) => Ok(*value),
            MaybeCast::Raw(raw) => Cast::<str>::cast(self, raw),
        }
    }

    fn describe(&self) -> String {
        Cast::<str>::describe(self)
    }
}

/// Cast matching null markers (`null`, `none`, empty) to `None`.
pub struct Null<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Returns the null cast producing `Option<T>`.
///
/// The output is always `None`; any other input is a [`CastError::NotNull`].
#[must_use]
pub const fn null_cast<T>() -> Null<T> {
    Null {
        _marker: PhantomData,
    }
}

/// Returns `true` if the value is one of the null markers.
pub(crate) fn is_null_marker(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "null" | "none" | "")
}

impl<T> Cast<str> for Null<T> {
    type Output = Option<T>;

    fn cast(&self, input: &str) -> Result<Option<T>, CastError> {
        if is_null_marker(input) {
            Ok(None)
        } else {
            Err(CastError::NotNull {
                value: input.to_string(),
            })
        }
    }

    fn describe(&self) -> String {
        "null_cast".to_string()
    }
}

impl<T> Clone for Null<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Null<T> {}

impl<T> fmt::Debug for Null<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Null")
    }
}
