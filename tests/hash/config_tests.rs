// Tests for configuration loading

use hsh::config::Config;
use hsh::hash::hash::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
use hsh::hash::{Algorithm, HashUtilityError};
use tempfile::TempDir;

use crate::write_file;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.algorithm().unwrap(), Algorithm::Sha256);
    assert!(!config.parallel);
    assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    assert!(config.color);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let config = Config::from_toml("default_algorithm = \"SHA512\"\nparallel = true\n", None).unwrap();
    assert_eq!(config.algorithm().unwrap(), Algorithm::Sha512);
    assert!(config.parallel);
    assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
}

#[test]
fn test_invalid_values_are_rejected() {
    for bad in [
        "buffer_size = 0",
        "default_algorithm = \"crc32\"",
        "parallel = \"yes\"",
        "unknown_key = 1",
    ] {
        match Config::from_toml(bad, None) {
            Err(HashUtilityError::ConfigError { .. }) => {}
            other => panic!("{}: expected ConfigError, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.toml", b"buffer_size = 8192\ncolor = false\n");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.buffer_size, 8192);
    assert!(!config.color);

    let missing = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(missing, Config::default());
}

#[test]
fn test_buffer_size_upper_bound() {
    let at_limit = format!("buffer_size = {}", MAX_BUFFER_SIZE);
    assert_eq!(Config::from_toml(&at_limit, None).unwrap().buffer_size, MAX_BUFFER_SIZE);

    let over = format!("buffer_size = {}", MAX_BUFFER_SIZE + 1);
    match Config::from_toml(&over, None) {
        Err(HashUtilityError::ConfigError { reason, .. }) => assert!(reason.contains("at most")),
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}

#[test]
fn test_unreadable_file_is_config_error() {
    let dir = TempDir::new().unwrap();

    // a directory exists but cannot be read as a file
    match Config::load_from(dir.path()) {
        Err(HashUtilityError::ConfigError { path, reason }) => {
            assert_eq!(path.as_deref(), Some(dir.path()));
            assert!(reason.starts_with("cannot read file"));
        }
        other => panic!("Expected ConfigError, got {:?}", other),
    }
}
