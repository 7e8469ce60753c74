//! Default values for resolver construction.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use super::Env;

/// Default `.env` file consulted by file-backed resolvers.
pub const ENV_FILE: &str = ".env";

/// Default variable holding the current relevancy (deployment environment).
pub const ENV_VAR: &str = "CONFIG_ENV";

/// Default maximum relevancy at which gated files are still consulted.
pub const MAX_RELEVANCY: Env = Env::Local;

/// Separator joining a declarative prefix and field name.
pub const NAME_SEPARATOR: &str = "_";
