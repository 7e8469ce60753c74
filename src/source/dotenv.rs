//! `.env` file parsing.
//!
//! Supported line forms:
//! - `KEY=VALUE`, `KEY="VALUE"`, `KEY='VALUE'`, optionally prefixed by `export `
//! - `# comment` lines (after optional leading whitespace)
//! - `KEY=VALUE # comment`: a `#` preceded by whitespace starts an inline comment
//!   in unquoted values; `KEY=abc#def` keeps the `#`
//!
//! A quoted value runs to the matching closing quote and anything after it is
//! ignored. A value opening a quote that is never closed is read as unquoted text.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::Source;
use crate::config::ConfigError;

static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#.*$").expect("inline comment pattern is valid"));

/// Parses `.env` content into key/value pairs, in file order.
///
/// Lines without `=` or with an empty key are skipped with a warning.
#[must_use]
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(line_num: usize, line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = line.strip_prefix("export ").map_or(line, str::trim_start);
    let Some((key, raw)) = line.split_once('=') else {
        tracing::warn!(line = line_num, "Skipping .env line without '='");
        return None;
    };

    let key = key.trim();
    if key.is_empty() {
        tracing::warn!(line = line_num, "Skipping .env line with empty key");
        return None;
    }

    tracing::trace!(line = line_num, key, "Parsed .env entry");
    Some((key.to_string(), parse_value(raw)))
}

fn parse_value(raw: &str) -> String {
    let trimmed = raw.trim_start();
    if let Some(quote) = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &trimmed[1..];
        if let Some(end) = body.find(quote) {
            return body[..end].to_string();
        }
    }
    INLINE_COMMENT.replace(raw, "").trim().to_string()
}

/// Values read from a `.env` style file.
///
/// Parsed once at construction; later duplicates of a key override earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl EnvFile {
    /// Loads a `.env` file.
    ///
    /// A file that does not exist yields an empty source.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No .env file, using empty source");
                return Ok(Self {
                    path: Some(path.to_path_buf()),
                    values: BTreeMap::new(),
                });
            }
            Err(e) => {
                return Err(ConfigError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut file = Self::parse(&content);
        tracing::debug!(path = %path.display(), entries = file.len(), "Loaded .env file");
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parses `.env` content held in memory.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self {
            path: None,
            values: parse_env_file(content).into_iter().collect(),
        }
    }

    /// Returns a copy with every key lower-cased.
    #[must_use]
    pub fn lowercased(self) -> Self {
        Self {
            path: self.path,
            values: self
                .values
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    /// Returns the path the values were loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the file had no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for EnvFile {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}
