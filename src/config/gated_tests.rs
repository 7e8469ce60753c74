//! Tests for the conditional resolver.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::{TempDir, tempdir};

use super::{
    Config, ConfigError, DotFile, Env, EnvConfig, OptionalConfig, RelevancyGate, Resolver,
    Validator,
};
use crate::cast::{CastError, boolean_cast, parse};
use crate::source::{EnvFile, EnvMapping};

/// Writes `.envconfig` with a value only the gated file has.
fn gated_file() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".envconfig");
    fs::write(&path, "ONLY_IN_FILE=from-file\nSHARED=file\n").unwrap();
    (dir, path)
}

const NO_DOTFILES: [DotFile; 0] = [];

fn env_config(env: &str, path: &Path, max_env: Env) -> Result<EnvConfig, ConfigError> {
    let mapping = EnvMapping::new([("CONFIG_ENV", env), ("SHARED", "env")]);
    EnvConfig::new(mapping, [DotFile::new(path).max_env(max_env)])
}

mod relevancy {
    use super::*;

    #[test]
    fn below_threshold_reads_gated_file() {
        let (_dir, path) = gated_file();
        let config = env_config("test", &path, Env::Local).unwrap();

        assert_eq!(config.env(), Env::Test);
        assert_eq!(config.raw("ONLY_IN_FILE").unwrap(), "from-file");
    }

    #[test]
    fn at_threshold_reads_gated_file() {
        let (_dir, path) = gated_file();
        let config = env_config("local", &path, Env::Local).unwrap();
        assert_eq!(config.raw("ONLY_IN_FILE").unwrap(), "from-file");
    }

    #[test]
    fn above_threshold_is_missing_name() {
        let (_dir, path) = gated_file();
        let config = env_config("prd", &path, Env::Local).unwrap();

        let err = config.raw("ONLY_IN_FILE").unwrap_err();
        assert!(matches!(&err, ConfigError::MissingName { name } if name == "ONLY_IN_FILE"));
    }

    #[test]
    fn above_threshold_still_uses_default() {
        let (_dir, path) = gated_file();
        let config = env_config("dev", &path, Env::Local).unwrap();

        let value = config.get_or("ONLY_IN_FILE", parse::<String>(), "fallback".into()).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn primary_mapping_wins_regardless_of_gate() {
        let (_dir, path) = gated_file();

        let open = env_config("test", &path, Env::Prd).unwrap();
        let closed = env_config("prd", &path, Env::Test).unwrap();
        assert_eq!(open.raw("SHARED").unwrap(), "env");
        assert_eq!(closed.raw("SHARED").unwrap(), "env");
    }

    #[test]
    fn each_file_has_its_own_threshold() {
        let dir = tempdir().unwrap();
        let local = dir.path().join(".env.local");
        let dev = dir.path().join(".env.dev");
        fs::write(&local, "A=local\nB=local\n").unwrap();
        fs::write(&dev, "B=dev\nC=dev\n").unwrap();

        let mapping = EnvMapping::new([("CONFIG_ENV", "dev")]);
        let config = EnvConfig::new(
            mapping,
            [
                DotFile::new(&local).max_env(Env::Local),
                DotFile::new(&dev).max_env(Env::Dev),
            ],
        )
        .unwrap();

        assert!(config.raw("A").unwrap_err().is_missing());
        assert_eq!(config.raw("B").unwrap(), "dev");
        assert_eq!(config.raw("C").unwrap(), "dev");
    }

    #[test]
    fn missing_dotfile_contributes_nothing() {
        let dir = tempdir().unwrap();
        let config = env_config("test", &dir.path().join("absent"), Env::Prd).unwrap();
        assert!(config.raw("ONLY_IN_FILE").unwrap_err().is_missing());
    }
}

mod bootstrap {
    use super::*;

    #[test]
    fn absent_env_fails_construction() {
        let err = EnvConfig::new(EnvMapping::new([("OTHER", "x")]), NO_DOTFILES).unwrap_err();
        assert!(matches!(&err, ConfigError::MissingName { name } if name == "CONFIG_ENV"));
    }

    #[test]
    fn invalid_env_fails_construction() {
        let err = EnvConfig::new(EnvMapping::new([("CONFIG_ENV", "staging")]), NO_DOTFILES).unwrap_err();

        assert!(matches!(&err, ConfigError::InvalidCast { name, .. } if name == "CONFIG_ENV"));
        assert!(matches!(err.cast_error(), Some(CastError::Other(_))));
    }

    #[test]
    fn custom_env_var() {
        let config = EnvConfig::with_env_var(
            "DEPLOY_STAGE",
            EnvMapping::new([("DEPLOY_STAGE", "dev")]),
            NO_DOTFILES,
        )
        .unwrap();
        assert_eq!(config.env(), Env::Dev);
    }

    fn flagged(flag: Option<&str>) -> Result<OptionalConfig<impl Validator + Clone>, ConfigError> {
        let pairs: Vec<(&str, &str)> = flag.map(|v| ("USE_LOCAL_SECRETS", v)).into_iter().collect();
        let primary = Config::with_mapping(EnvMapping::new(pairs));
        let files = [EnvFile::parse("TOKEN=a\n"), EnvFile::parse("TOKEN=b\nOTHER=c\n")];

        OptionalConfig::from_relevancy(primary, files, |cfg: &Config| {
            let enabled = cfg.get("USE_LOCAL_SECRETS", boolean_cast().strict())?;
            Ok(move |_: &str| enabled)
        })
    }

    #[test]
    fn relevancy_validator_gates_every_file() {
        let open = flagged(Some("true")).unwrap();
        assert_eq!(open.raw("TOKEN").unwrap(), "a");
        assert_eq!(open.raw("OTHER").unwrap(), "c");
        assert_eq!(open.validators().count(), 2);

        let closed = flagged(Some("false")).unwrap();
        assert!(closed.raw("TOKEN").unwrap_err().is_missing());
    }

    #[test]
    fn relevancy_validator_fails_fast() {
        let absent = flagged(None).unwrap_err();
        assert!(matches!(&absent, ConfigError::MissingName { name } if name == "USE_LOCAL_SECRETS"));

        let invalid = flagged(Some("maybe")).unwrap_err();
        assert!(matches!(&invalid, ConfigError::InvalidCast { name, .. } if name == "USE_LOCAL_SECRETS"));
    }

    #[test]
    fn env_may_come_from_primary_file() {
        let primary = Config::with_mapping(EnvMapping::new(Vec::<(String, String)>::new()))
            .with_file(EnvFile::parse("CONFIG_ENV=local\n"));

        let config = EnvConfig::from_primary(primary, "CONFIG_ENV", NO_DOTFILES).unwrap();
        assert_eq!(config.env(), Env::Local);
    }
}

mod validators {
    use super::*;

    fn primary() -> Config {
        Config::with_mapping(EnvMapping::new([("PRESENT", "primary")]))
    }

    #[test]
    fn relevancy_gate_compares_rank() {
        assert!(RelevancyGate::new(Env::Test, Env::Local).validate("ANY"));
        assert!(RelevancyGate::new(Env::Local, Env::Local).validate("ANY"));
        assert!(!RelevancyGate::new(Env::Dev, Env::Local).validate("ANY"));
    }

    #[test]
    fn closure_gates_per_name() {
        let config = OptionalConfig::new(primary()).with_gated(
            EnvFile::parse("FEATURE_X=on\nSECRET=hunter2\n"),
            |name: &str| name.starts_with("FEATURE_"),
        );

        assert_eq!(config.raw("FEATURE_X").unwrap(), "on");
        assert!(config.raw("SECRET").unwrap_err().is_missing());
        assert_eq!(config.raw("PRESENT").unwrap(), "primary");
    }

    #[test]
    fn validator_runs_once_per_name() {
        let calls = AtomicUsize::new(0);
        let validator = |_: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            true
        };
        let config = OptionalConfig::new(primary()).with_gated(EnvFile::parse("A=1\n"), &validator);

        config.raw("A").unwrap();
        config.raw("A").unwrap();
        assert!(config.raw("B").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn primary_hit_skips_validator() {
        let config = OptionalConfig::new(primary())
            .with_gated(EnvFile::parse("PRESENT=gated\n"), |_: &str| -> bool {
                panic!("must not run")
            });

        assert_eq!(config.raw("PRESENT").unwrap(), "primary");
    }
}
