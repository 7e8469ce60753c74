//! Relevancy levels (deployment environments).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Deployment environment, ordered from least to most sensitive.
///
/// The ordering is the relevancy rank: `Test < Local < Dev < Prd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Env {
    /// Automated test runs
    Test,
    /// Developer machines
    Local,
    /// Shared development deployments
    Dev,
    /// Production
    Prd,
}

/// Error returned when a string is not a known [`Env`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid environment '{value}': expected test, local, dev, or prd")]
pub struct ParseEnvError {
    /// The rejected value
    pub value: String,
}

impl Env {
    /// All environments in relevancy order.
    pub const ALL: [Self; 4] = [Self::Test, Self::Local, Self::Dev, Self::Prd];

    /// Returns the configuration spelling of this environment.
    #[must_use]
    pub const fn val(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Prd => "prd",
        }
    }

    /// Returns the relevancy rank, 0 for `Test` up to 3 for `Prd`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

impl FromStr for Env {
    type Err = ParseEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.val() == s)
            .ok_or_else(|| ParseEnvError {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.val())
    }
}
