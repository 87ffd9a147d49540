//! Unit tests for environment-driven configuration.
//!
//! Uses `AppConfig::from_lookup` with a map so tests never touch the
//! process environment.

use std::collections::HashMap;
use std::path::PathBuf;

use pocketlinks::config::{AppConfig, Backend, DB_FILE_NAME};
use pocketlinks::types::errors::ConfigError;
use rstest::rstest;

fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_defaults_when_nothing_set() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.backend, Backend::Local);
    assert_eq!(config.slot, "pocket-links");
    assert_eq!(config.endpoint, "http://localhost:8080/api/links");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.connect_timeout_secs, 10);
}

#[rstest]
#[case("local", Backend::Local)]
#[case("remote", Backend::Remote)]
#[case("memory", Backend::Memory)]
#[case(" Remote ", Backend::Remote)]
fn test_backend_parsing(#[case] raw: &str, #[case] expected: Backend) {
    let config = config_from(&[("POCKETLINKS_BACKEND", raw)]).unwrap();
    assert_eq!(config.backend, expected);
}

#[test]
fn test_unknown_backend_is_error() {
    assert_eq!(
        config_from(&[("POCKETLINKS_BACKEND", "s3")]),
        Err(ConfigError::InvalidBackend("s3".to_string()))
    );
}

#[test]
fn test_overrides_are_applied() {
    let config = config_from(&[
        ("POCKETLINKS_BACKEND", "remote"),
        ("POCKETLINKS_DATA_DIR", "/var/lib/links"),
        ("POCKETLINKS_SLOT", "work-links"),
        ("POCKETLINKS_ENDPOINT", "https://links.example.com/api/links"),
        ("POCKETLINKS_REQUEST_TIMEOUT_SECS", "5"),
        ("POCKETLINKS_CONNECT_TIMEOUT_SECS", " 2 "),
    ])
    .unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/var/lib/links"));
    assert_eq!(config.db_path(), PathBuf::from("/var/lib/links").join(DB_FILE_NAME));
    assert_eq!(config.slot, "work-links");
    assert_eq!(config.endpoint, "https://links.example.com/api/links");
    assert_eq!(config.request_timeout().as_secs(), 5);
    assert_eq!(config.connect_timeout().as_secs(), 2);
}

#[test]
fn test_empty_values_count_as_unset() {
    let config = config_from(&[("POCKETLINKS_SLOT", ""), ("POCKETLINKS_BACKEND", "  ")]).unwrap();
    assert_eq!(config.slot, "pocket-links");
    assert_eq!(config.backend, Backend::Local);
}

#[test]
fn test_invalid_timeout_is_error() {
    let err = config_from(&[("POCKETLINKS_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidNumber {
            var: "POCKETLINKS_REQUEST_TIMEOUT_SECS".to_string(),
            value: "soon".to_string(),
        }
    );
}
