//! envcast: typed configuration value resolver
//!
//! Entry point for the envcast application.

use envcast::config::{Cli, Command, write_default_schema};
use envcast::source::EnvMapping;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let env = EnvMapping::from_env().snapshot();
    let result = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Get(args) => run::execute_get(args, env),
        Command::Bind { schema, env_file } => run::execute_bind(schema, env_file, env),
    };

    report(result.and_then(|value| run::render(&value)))
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_schema(output) {
        Ok(()) => {
            println!("Schema template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Prints the rendered result or the error, and maps it to an exit code.
fn report(result: Result<String, RunError>) -> ExitCode {
    match result {
        Ok(rendered) => {
            println!("{rendered}");
            exit_code::SUCCESS
        }
        Err(e) if e.is_usage() => {
            eprintln!("Usage error: {e}");
            exit_code::usage_error()
        }
        Err(RunError::Config(e)) => {
            eprintln!("Configuration error: {e}");
            if let Some(source) = std::error::Error::source(&e) {
                eprintln!("  caused by: {source}");
            }
            print_config_hint(&e);
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

