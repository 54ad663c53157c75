use std::collections::HashMap;
use std::path::PathBuf;

use study_planner::config::{ConfigError, PlannerConfig};
use study_planner::StorageBackend;
use tempfile::TempDir;

#[test]
fn defaults_apply_when_the_file_is_missing() {
    let dir = TempDir::new().unwrap();
    let config = PlannerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, PlannerConfig::default());
    assert_eq!(config.user, "default");
    assert_eq!(config.storage.backend, StorageBackend::Json);
    assert_eq!(config.storage.path, PathBuf::from(".study-planner"));
    assert_eq!(config.http.addr, "127.0.0.1:3000");
    assert_eq!(config.log.filter, "info");
}

#[test]
fn partial_files_keep_remaining_defaults() {
    let config = PlannerConfig::from_toml_str(
        r#"
        user = "sam"

        [storage]
        backend = "sqlite"
        path = "plans.db"
        "#,
    )
    .unwrap();
    assert_eq!(config.user, "sam");
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.path, PathBuf::from("plans.db"));
    assert_eq!(config.http.addr, "127.0.0.1:3000");
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("study-planner.toml");
    std::fs::write(&path, "[log]\nfilter = \"debug\"\n").unwrap();
    let config = PlannerConfig::load(&path).unwrap();
    assert_eq!(config.log.filter, "debug");
}

#[test]
fn malformed_files_are_reported() {
    let err = PlannerConfig::from_toml_str("[storage]\nbackend = \"floppy\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn environment_overrides_the_file() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("STUDY_PLANNER_USER", "kim"),
        ("STUDY_PLANNER_STORAGE", "Memory"),
        ("STUDY_PLANNER_DATA_PATH", "/tmp/plans"),
        ("STUDY_PLANNER_HTTP_ADDR", "0.0.0.0:8080"),
    ]);
    let mut config = PlannerConfig::default();
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.user, "kim");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.path, PathBuf::from("/tmp/plans"));
    assert_eq!(config.http.addr, "0.0.0.0:8080");
}

#[test]
fn blank_or_unknown_overrides_are_ignored() {
    let vars: HashMap<&str, &str> =
        HashMap::from([("STUDY_PLANNER_USER", "  "), ("STUDY_PLANNER_STORAGE", "tape")]);
    let mut config = PlannerConfig::default();
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(config, PlannerConfig::default());
}
