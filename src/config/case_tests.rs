//! Tests for the case-insensitive resolver.

use super::{CiConfig, Resolver};
use crate::cast::{boolean_cast, parse};
use crate::source::{EnvFile, LowerEnvMapping};

#[test]
fn upper_case_name_finds_lower_case_key() {
    let config = CiConfig::new(LowerEnvMapping::new([("debug", "true"), ("port", "80")]));

    assert!(config.get("DEBUG", boolean_cast().strict()).unwrap());
    assert_eq!(config.get("Port", parse::<u16>()).unwrap(), 80);
}

#[test]
fn mixed_case_keys_are_folded_on_insert() {
    let config = CiConfig::new(LowerEnvMapping::new([("Database_Url", "postgres://db")]));
    assert_eq!(config.raw("DATABASE_URL").unwrap(), "postgres://db");
}

#[test]
fn file_keys_are_folded() {
    let config = CiConfig::new(LowerEnvMapping::new(Vec::<(String, String)>::new()))
        .with_file(EnvFile::parse("LOG_LEVEL=debug\n"));

    assert_eq!(config.raw("log_level").unwrap(), "debug");
}

#[test]
fn missing_name_keeps_requested_spelling() {
    let config = CiConfig::new(LowerEnvMapping::new([("a", "1")]));
    let err = config.raw("ABSENT").unwrap_err();

    assert_eq!(err.to_string(), "Missing required name: ABSENT");
}
