//! Path existence cast.

use std::path::PathBuf;

use super::{Cast, CastError, MaybeCast};

/// Cast converting a string to a path that must exist on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidPath;

/// Returns the path existence cast.
///
/// A leading `~` is expanded to the home directory.
#[must_use]
pub const fn valid_path() -> ValidPath {
    ValidPath
}

/// Expands a leading `~` or `~/` against the home directory.
fn expand_tilde(raw: &str) -> PathBuf {
    match raw.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map_or_else(|| PathBuf::from(raw), |home| home.join(&rest[1..])),
        _ => PathBuf::from(raw),
    }
}

fn check_exists(path: PathBuf) -> Result<PathBuf, CastError> {
    match std::fs::metadata(&path) {
        Ok(_) => Ok(path),
        Err(source) => Err(CastError::PathNotFound { path, source }),
    }
}

impl Cast<str> for ValidPath {
    type Output = PathBuf;

    fn cast(&self, input: &str) -> Result<PathBuf, CastError> {
        check_exists(expand_tilde(input))
    }

    fn describe(&self) -> String {
        "valid_path".to_string()
    }
}

impl Cast<MaybeCast<PathBuf>> for ValidPath {
    type Output = PathBuf;

    fn cast(&self, input: &MaybeCast<PathBuf>) -> Result<PathBuf, CastError> {
        match input {
            MaybeCast::Cast(path) => Ok(path.clone()),
            MaybeCast::Raw(raw) => Cast::<str>::cast(self, raw),
        }
    }

    fn describe(&self) -> String {
        Cast::<str>::describe(self)
    }
}
