//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::defaults::{ENV_FILE, ENV_VAR};
use super::{Env, FieldKind};

/// envcast: typed configuration value resolver
///
/// Resolves names from the environment and `.env` files, casts them to
/// typed values, and prints the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "envcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for envcast
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a single name
    Get(GetArgs),

    /// Resolve every field of a schema file
    Bind {
        /// Path to the TOML schema file
        #[arg(long, short)]
        schema: PathBuf,

        /// `.env` file consulted after the environment (ignored if absent)
        #[arg(long = "env-file", default_value = ENV_FILE)]
        env_file: PathBuf,
    },

    /// Generate a schema template
    Init {
        /// Output path for the schema file
        #[arg(long, short, default_value = "envcast.toml")]
        output: PathBuf,
    },
}

/// Arguments of the `get` subcommand.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Name to resolve
    pub name: String,

    /// Cast applied to the raw value
    #[arg(long, value_enum, default_value_t = CastArg::Str)]
    pub cast: CastArg,

    /// Parse the value as a comma-separated list
    #[arg(long)]
    pub list: bool,

    /// Raw value used when the name is absent (cast like a found value)
    #[arg(long)]
    pub default: Option<String>,

    /// `.env` file consulted after the environment (ignored if absent)
    #[arg(long = "env-file", default_value = ENV_FILE)]
    pub env_file: PathBuf,

    /// Ignore the case of names
    #[arg(long = "ignore-case", conflicts_with = "gated_file")]
    pub ignore_case: bool,

    /// `.env` file consulted only up to `--max-env` (can be specified multiple times)
    #[arg(long = "gated-file", value_name = "PATH")]
    pub gated_file: Vec<PathBuf>,

    /// Most sensitive environment gated files apply to
    #[arg(long = "max-env", value_enum, default_value_t = EnvArg::Local)]
    pub max_env: EnvArg,

    /// Variable holding the current environment
    #[arg(long = "env-var", default_value = ENV_VAR)]
    pub env_var: String,
}

/// Cast argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CastArg {
    /// Raw string
    Str,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Strict boolean
    Bool,
    /// Null marker
    Null,
    /// Existing path
    Path,
}

impl From<CastArg> for FieldKind {
    fn from(arg: CastArg) -> Self {
        match arg {
            CastArg::Str => Self::Str,
            CastArg::Int => Self::Int,
            CastArg::Float => Self::Float,
            CastArg::Bool => Self::Bool,
            CastArg::Null => Self::Null,
            CastArg::Path => Self::Path,
        }
    }
}

/// Environment argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvArg {
    /// Automated test runs
    Test,
    /// Developer machines
    Local,
    /// Shared development deployments
    Dev,
    /// Production
    Prd,
}

impl From<EnvArg> for Env {
    fn from(arg: EnvArg) -> Self {
        match arg {
            EnvArg::Test => Self::Test,
            EnvArg::Local => Self::Local,
            EnvArg::Dev => Self::Dev,
            EnvArg::Prd => Self::Prd,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning usage errors.
    ///
    /// # Errors
    ///
    /// Returns the clap error if the arguments are invalid.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
