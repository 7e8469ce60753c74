//! Comma separated sequence cast.
//!
//! Splitting follows POSIX shell-lexer rules with the comma as the only
//! separator, so quoted items may contain commas.

use std::iter::Peekable;
use std::str::Chars;

use super::{Cast, CastError, MaybeCast};

/// Cast splitting a comma separated string and casting every item.
#[derive(Debug, Clone)]
pub struct CommaSeparated<C> {
    inner: C,
}

/// Returns a cast producing a `Vec` of items cast with `cast`.
///
/// Items are trimmed before casting. Quoted items keep their commas.
///
/// # Examples
///
/// ```
/// use envcast::cast::{Cast, comma_separated, identity, parse};
///
/// assert_eq!(comma_separated(identity()).cast("a, b, c").unwrap(), ["a", "b", "c"]);
/// assert_eq!(comma_separated(parse::<i32>()).cast("1, 2, 3").unwrap(), [1, 2, 3]);
/// assert_eq!(comma_separated(identity()).cast("'x, y', z").unwrap(), ["x, y", "z"]);
/// ```
#[must_use]
pub const fn comma_separated<C>(cast: C) -> CommaSeparated<C> {
    CommaSeparated { inner: cast }
}

impl<C: Cast<str>> Cast<str> for CommaSeparated<C> {
    type Output = Vec<C::Output>;

    fn cast(&self, input: &str) -> Result<Self::Output, CastError> {
        split_comma_separated(input)?
            .iter()
            .map(|item| self.inner.cast(item.trim()))
            .collect()
    }

    fn describe(&self) -> String {
        format!("{} sequence", self.inner.describe())
    }
}

impl<C> Cast<MaybeCast<Vec<C::Output>>> for CommaSeparated<C>
where
    C: Cast<str>,
    C::Output: Clone,
{
    type Output = Vec<C::Output>;

    fn cast(&self, input: &MaybeCast<Vec<C::Output>>) -> Result<Self::Output, CastError> {
        match input {
            MaybeCast::Cast(items) => Ok(items.clone()),
            MaybeCast::Raw(raw) => Cast::<str>::cast(self, raw),
        }
    }

    fn describe(&self) -> String {
        Cast::<str>::describe(self)
    }
}

/// Splits a string on unquoted commas.
///
/// Quotes are removed, backslash escapes are honored outside single quotes
/// and an unquoted `#` comments out the rest of the line. Items are returned
/// untrimmed; empty runs between commas produce no item.
///
/// # Errors
///
/// Returns [`CastError::Tokenize`] on an unclosed quote or a trailing escape.
pub fn split_comma_separated(value: &str) -> Result<Vec<String>, CastError> {
    let tokenize_error = |reason| CastError::Tokenize {
        value: value.to_string(),
        reason,
    };

    let mut items = Vec::new();
    let mut token = String::new();
    let mut has_token = false;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ',' => {
                if has_token {
                    items.push(std::mem::take(&mut token));
                    has_token = false;
                }
            }
            '#' => {
                skip_line(&mut chars);
                if has_token {
                    items.push(std::mem::take(&mut token));
                    has_token = false;
                }
            }
            '\'' | '"' => {
                read_quoted(c, &mut chars, &mut token)
                    .map_err(tokenize_error)?;
                has_token = true;
            }
            '\\' => {
                let escaped = chars.next().ok_or_else(|| tokenize_error("No escaped character"))?;
                token.push(escaped);
                has_token = true;
            }
            other => {
                token.push(other);
                has_token = true;
            }
        }
    }

    if has_token {
        items.push(token);
    }
    Ok(items)
}

fn skip_line(chars: &mut Peekable<Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

/// Reads a quoted section up to and including the closing quote.
fn read_quoted(
    quote: char,
    chars: &mut Peekable<Chars<'_>>,
    token: &mut String,
) -> Result<(), &'static str> {
    while let Some(c) = chars.next() {
        if c == quote {
            return Ok(());
        }
        if quote == '"' && c == '\\' {
            match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    token.push(next);
                    chars.next();
                }
                Some(_) => token.push(c),
                None => return Err("No escaped character"),
            }
            continue;
        }
        token.push(c);
    }
    Err("No closing quotation")
}
