//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{CastArg, Cli, Command, EnvArg};
use super::{Env, FieldKind};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_get() {
        let cli = Cli::parse_from_iter(["envcast", "get", "PORT"]);

        let Command::Get(args) = cli.command else {
            panic!("expected get command");
        };
        assert_eq!(args.name, "PORT");
        assert_eq!(args.cast, CastArg::Str);
        assert!(!args.list);
        assert!(args.default.is_none());
        assert!(args.gated_file.is_empty());
        assert_eq!(args.max_env, EnvArg::Local);
        assert_eq!(args.env_var, "CONFIG_ENV");
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_all_casts() {
        for (value, expected) in [
            ("str", CastArg::Str),
            ("int", CastArg::Int),
            ("float", CastArg::Float),
            ("bool", CastArg::Bool),
            ("null", CastArg::Null),
            ("path", CastArg::Path),
        ] {
            let cli = Cli::parse_from_iter(["envcast", "get", "X", "--cast", value]);
            let Command::Get(args) = cli.command else {
                panic!("expected get command");
            };
            assert_eq!(args.cast, expected);
        }
    }

    #[test]
    fn parse_gated_options() {
        let cli = Cli::parse_from_iter([
            "envcast",
            "get",
            "SECRET",
            "--gated-file",
            ".env.local",
            "--gated-file",
            ".env.dev",
            "--max-env",
            "dev",
            "--env-var",
            "STAGE",
            "--env-file",
            ".env.shared",
        ]);

        let Command::Get(args) = cli.command else {
            panic!("expected get command");
        };
        assert_eq!(
            args.gated_file,
            [PathBuf::from(".env.local"), PathBuf::from(".env.dev")]
        );
        assert_eq!(args.max_env, EnvArg::Dev);
        assert_eq!(args.env_var, "STAGE");
        assert_eq!(args.env_file, PathBuf::from(".env.shared"));
    }

    #[test]
    fn parse_bind() {
        let cli = Cli::parse_from_iter(["envcast", "bind", "--schema", "envcast.toml", "-v"]);

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Bind { ref schema, ref env_file }
                if schema == &PathBuf::from("envcast.toml") && env_file == &PathBuf::from(".env")
        ));
    }

    #[test]
    fn parse_init_default_output() {
        let cli = Cli::parse_from_iter(["envcast", "init"]);

        assert!(cli.is_init());
        assert!(matches!(
            cli.command,
            Command::Init { ref output } if output == &PathBuf::from("envcast.toml")
        ));
    }

    #[test]
    fn ignore_case_conflicts_with_gated_file() {
        let result = Cli::try_parse_from_iter([
            "envcast",
            "get",
            "X",
            "--ignore-case",
            "--gated-file",
            ".env",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_subcommand_is_error() {
        assert!(Cli::try_parse_from_iter(["envcast"]).is_err());
    }
}

mod conversions {
    use super::*;

    #[test]
    fn env_arg_converts_to_env() {
        assert_eq!(Env::from(EnvArg::Test), Env::Test);
        assert_eq!(Env::from(EnvArg::Local), Env::Local);
        assert_eq!(Env::from(EnvArg::Dev), Env::Dev);
        assert_eq!(Env::from(EnvArg::Prd), Env::Prd);
    }

    #[test]
    fn cast_arg_converts_to_field_kind() {
        assert_eq!(FieldKind::from(CastArg::Int), FieldKind::Int);
        assert_eq!(FieldKind::from(CastArg::Path), FieldKind::Path);
        assert_eq!(FieldKind::from(CastArg::Null), FieldKind::Null);
    }
}
