//! Tests for the base resolver.

use std::error::Error as _;
use std::fs;
use std::num::ParseIntError;

use proptest::prelude::*;
use tempfile::tempdir;

use super::{Config, ConfigError, Fallback, MISSING, Resolver};
use crate::cast::{
    CastError, InvalidEnv, Literal, boolean_cast, comma_separated, identity, literal_cast,
    none_is_missing, null_cast, parse, valid_path, with_rule,
};
use crate::source::{EnvFile, EnvMapping};

fn config_with(pairs: &[(&str, &str)]) -> Config {
    Config::with_mapping(EnvMapping::new(pairs.iter().copied()))
}

mod lookup {
    use super::*;

    proptest! {
        #[test]
        fn present_name_returns_raw_string(name in "[A-Za-z_][A-Za-z0-9_]{0,16}", value in ".*") {
            let config = config_with(&[(name.as_str(), value.as_str())]);
            prop_assert_eq!(config.raw(&name).unwrap(), value);
        }
    }

    #[test]
    fn absent_name_without_default_is_missing() {
        let config = config_with(&[]);
        let err = config.raw("NOT_THERE").unwrap_err();

        assert!(matches!(&err, ConfigError::MissingName { name } if name == "NOT_THERE"));
        assert!(err.source().is_none());
    }

    #[test]
    fn explicit_missing_sentinel_behaves_like_no_default() {
        let config = config_with(&[]);
        assert!(config.resolve("NOT_THERE", identity(), MISSING).unwrap_err().is_missing());
    }

    #[test]
    fn mapping_wins_over_file() {
        let config = config_with(&[("HOST", "from-env")]).with_file(EnvFile::parse("HOST=from-file"));
        assert_eq!(config.raw("HOST").unwrap(), "from-env");
    }

    #[test]
    fn file_answers_when_mapping_has_no_value() {
        let config = config_with(&[]).with_file(EnvFile::parse("HOST=from-file\n"));
        assert_eq!(config.raw("HOST").unwrap(), "from-file");
    }

    #[test]
    fn from_env_file_reads_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ENVCAST_RESOLVER_TEST_ONLY=\"quoted value\"\n").unwrap();

        let config = Config::from_env_file(&path).unwrap();
        assert_eq!(config.raw("ENVCAST_RESOLVER_TEST_ONLY").unwrap(), "quoted value");
        assert_eq!(config.file_values().path(), Some(path.as_path()));
    }

    #[test]
    fn from_env_file_with_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let config = Config::from_env_file(dir.path().join("absent.env")).unwrap();
        assert!(config.file_values().is_empty());
    }
}

mod defaults {
    use super::*;

    #[test]
    fn default_returned_without_casting() {
        let config = config_with(&[]);
        let value = config.get_or("PORT", parse::<u16>(), 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn default_ignored_when_present() {
        let config = config_with(&[("PORT", "9000")]);
        assert_eq!(config.get_or("PORT", parse::<u16>(), 8080).unwrap(), 9000);
    }

    #[test]
    fn none_is_a_valid_default() {
        let config = config_with(&[]);
        let value = config.get_or("OPTIONAL", null_cast::<String>(), None).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn lazy_default_only_runs_when_absent() {
        let config = config_with(&[("NAME", "given")]);

        let value = config
            .get_or_else("NAME", identity(), || panic!("must not run"))
            .unwrap();
        assert_eq!(value, "given");

        let value = config
            .get_or_else("OTHER", identity(), || "computed".to_string())
            .unwrap();
        assert_eq!(value, "computed");
    }

    #[test]
    fn lazy_fallback_through_resolve() {
        let config = config_with(&[]);
        let value = config
            .resolve("WORKERS", parse::<u8>(), Fallback::lazy(|| 4))
            .unwrap();
        assert_eq!(value, 4);
    }
}

mod casting {
    use super::*;

    #[test]
    fn cast_failure_is_invalid_cast_with_cause() {
        let config = config_with(&[("PORT", "eighty")]);
        let err = config.get("PORT", |s: &str| s.parse::<u16>()).unwrap_err();

        assert!(matches!(&err, ConfigError::InvalidCast { name, .. } if name == "PORT"));
        let cause = err.source().unwrap();
        assert!(matches!(
            cause.downcast_ref::<CastError>(),
            Some(CastError::Other(inner)) if inner.downcast_ref::<ParseIntError>().is_some()
        ));
    }

    #[test]
    fn strict_boolean_no_match_is_invalid_cast() {
        let config = config_with(&[("FLAG", "maybe")]);
        let err = config.get("FLAG", boolean_cast().strict()).unwrap_err();
        assert!(matches!(err.cast_error(), Some(CastError::NoMatch { .. })));
    }

    #[test]
    fn lenient_boolean_no_match_is_none() {
        let config = config_with(&[("FLAG", "maybe"), ("ON", "TRUE")]);
        assert_eq!(config.get("FLAG", boolean_cast()).unwrap(), None);
        assert_eq!(config.get("ON", boolean_cast()).unwrap(), Some(true));
    }

    #[test]
    fn rule_failure_keeps_invalid_env_as_cause() {
        let config = config_with(&[("LEVEL", "verbose")]);
        let cast = with_rule("is_level", |v: &str| ["info", "debug"].contains(&v));
        let err = config.get("LEVEL", cast).unwrap_err();

        let Some(CastError::Rule(InvalidEnv { rule, value })) = err.cast_error() else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(rule, "is_level");
        assert_eq!(value, "verbose");
        assert_eq!(
            err.source().unwrap().to_string(),
            "Value verbose did not pass rule check is_level"
        );
    }

    #[test]
    fn missing_path_keeps_io_error_as_cause() {
        let dir = tempdir().unwrap();
        let absent = dir.path().join("absent");
        let config = config_with(&[("DATA_DIR", absent.to_str().unwrap())]);

        let err = config.get("DATA_DIR", valid_path()).unwrap_err();
        let cast_error = err.cast_error().unwrap();
        assert!(matches!(cast_error, CastError::PathNotFound { .. }));
        assert!(cast_error.source().unwrap().downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn existing_path_resolves() {
        let dir = tempdir().unwrap();
        let config = config_with(&[("DATA_DIR", dir.path().to_str().unwrap())]);
        assert_eq!(config.get("DATA_DIR", valid_path()).unwrap(), dir.path());
    }

    #[test]
    fn comma_separated_of_ints() {
        let config = config_with(&[("PORTS", "1, 2, 3")]);
        assert_eq!(
            config.get("PORTS", comma_separated(parse::<i32>())).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn literal_matches_and_lists_candidates() {
        let candidates = [
            Literal::from(1),
            Literal::from("other"),
            Literal::from(&b"another"[..]),
            Literal::member("Test", "VALUE", "value"),
            Literal::Null,
            Literal::from(false),
        ];
        let config = config_with(&[("A", "other"), ("B", "1"), ("C", "invalid")]);

        assert_eq!(config.get("A", literal_cast(candidates.clone())).unwrap(), Literal::from("other"));
        assert_eq!(config.get("B", literal_cast(candidates.clone())).unwrap(), Literal::Int(1));

        let err = config.get("C", literal_cast(candidates)).unwrap_err();
        assert!(matches!(err.cast_error(), Some(CastError::Literal { .. })));
        assert!(err.source().unwrap().to_string().contains("\"other\""));
    }

    #[test]
    fn none_is_missing_reports_missing_name() {
        let config = config_with(&[("EMPTY", "null")]);
        let err = config.get("EMPTY", none_is_missing(null_cast::<String>())).unwrap_err();

        assert!(matches!(&err, ConfigError::MissingName { name } if name == "EMPTY"));
    }

    #[test]
    fn none_is_missing_defaults_apply_only_when_absent() {
        let config = config_with(&[("RATIO", "0.5")]);
        let cast = none_is_missing(|s: &str| s.parse::<f64>().map(Some));

        assert!((config.get("RATIO", cast.clone()).unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((config.get_or("ABSENT", cast, 1.0).unwrap() - 1.0).abs() < f64::EPSILON);
    }
}
