use clonify_common::observability::LogFormat;
use clonify_config::ClonifyConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_and_env_overrides_merge() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
proxy:
  endpoint: "https://${PROXY_HOST}/get"
  timeout_secs: 12
download:
  dir: "/tmp/clones"
logging:
  format: json
  filter: "clonify=debug"
"#;
    let p = write_yaml(&tmp, "clonify.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("PROXY_HOST", Some("proxy.internal")),
            ("CLONIFY__PROXY__RETRIES", Some("2")),
            ("CLONIFY__UI__TICK_MS", Some("25")),
        ],
        || {
            let config = ClonifyConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.proxy.endpoint, "https://proxy.internal/get");
            assert_eq!(config.proxy.timeout_secs, 12);
            assert_eq!(config.proxy.retries, 2);
            assert_eq!(config.proxy.content_field, "contents");
            assert_eq!(config.download.dir, PathBuf::from("/tmp/clones"));
            assert_eq!(config.ui.tick_ms, 25);
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.logging.filter, "clonify=debug");
        },
    );
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    assert!(ClonifyConfigLoader::new().with_file(missing).load().is_err());
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");
    let config = ClonifyConfigLoader::new()
        .with_optional_file(missing)
        .load()
        .expect("defaults");
    assert_eq!(config.ui.max_particles, 150);
    assert_eq!(config.ui.shapes, 8);
    assert_eq!(config.proxy.retries, 0);
}

#[test]
#[serial]
fn invalid_endpoint_fails_validation() {
    let result = ClonifyConfigLoader::new()
        .with_yaml_str("proxy:\n  endpoint: \"not-a-url\"\n")
        .load();
    assert!(result.is_err());
}
