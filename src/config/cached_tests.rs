//! Tests for the cached resolver.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CachedConfig, Config, ConfigError};
use crate::cast::{boolean_cast, identity, named, parse};
use crate::source::EnvMapping;

fn cached(pairs: &[(&str, &str)]) -> CachedConfig {
    CachedConfig::new(Config::with_mapping(EnvMapping::new(pairs.iter().copied())))
}

mod replay {
    use super::*;

    #[test]
    fn later_cast_is_ignored_for_same_output_type() {
        let config = cached(&[("KEY", "Value")]);

        assert_eq!(config.get("KEY", identity()).unwrap(), "Value");
        let upper = named("upper", |s: &str| Ok::<_, Infallible>(s.to_uppercase()));
        assert_eq!(config.get("KEY", upper).unwrap(), "Value");
    }

    #[test]
    fn cast_runs_once() {
        let calls = AtomicUsize::new(0);
        let config = cached(&[("PORT", "8080")]);
        let counting = |s: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            s.parse::<u16>()
        };

        assert_eq!(config.get("PORT", &counting).unwrap(), 8080);
        assert_eq!(config.get("PORT", &counting).unwrap(), 8080);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_is_cached_too() {
        let config = cached(&[]);

        assert_eq!(config.get_or("WORKERS", parse::<u8>(), 4).unwrap(), 4);
        assert_eq!(config.get_or("WORKERS", parse::<u8>(), 8).unwrap(), 4);
        assert!(config.is_cached("WORKERS"));
    }

    #[test]
    fn different_output_type_is_a_conflict() {
        let config = cached(&[("KEY", "true")]);
        config.raw("KEY").unwrap();

        let err = config.get("KEY", boolean_cast()).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::CacheConflict { name, cached, .. } if name == "KEY" && cached == "str"
        ));
    }
}

mod failures {
    use super::*;

    #[test]
    fn missing_name_is_not_cached() {
        let config = cached(&[]);

        assert!(config.raw("ABSENT").unwrap_err().is_missing());
        assert!(!config.is_cached("ABSENT"));
        assert_eq!(config.get_or("ABSENT", identity(), "later".into()).unwrap(), "later");
    }

    #[test]
    fn invalid_cast_is_not_cached() {
        let config = cached(&[("PORT", "eighty")]);

        assert!(config.get("PORT", parse::<u16>()).is_err());
        assert_eq!(config.raw("PORT").unwrap(), "eighty");
    }
}

mod reset {
    use super::*;

    #[test]
    fn clear_forgets_resolutions() {
        let config = cached(&[("KEY", "1")]);
        config.raw("KEY").unwrap();

        config.clear();
        assert!(!config.is_cached("KEY"));
        assert_eq!(config.get("KEY", parse::<i32>()).unwrap(), 1);
    }
}
