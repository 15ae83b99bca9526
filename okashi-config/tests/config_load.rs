use okashi_common::observability::LogFormat;
use okashi_config::OkashiConfigLoader;
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
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
api:
  endpoint: "https://mirror.example.com/toriko/api/"
  apikey: "${OKASHI_TEST_APIKEY}"
  max: 20
  order: "r"
  timeout_secs: 30
store:
  mailbox: 16
logging:
  dir: "/tmp/okashi-logs"
  format: json
  filter: "okashi=debug"
  stderr: true
  "#;
    let p = write_yaml(&tmp, "okashi.yaml", file_yaml);

    let config = temp_env::with_var("OKASHI_TEST_APIKEY", Some("from-env"), || {
        OkashiConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load okashi config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(
        config.api.endpoint.as_str(),
        "https://mirror.example.com/toriko/api/"
    );
    assert_eq!(config.api.apikey, "from-env");
    assert_eq!(config.api.max, 20);
    assert_eq!(config.api.timeout_secs, Some(30));
    assert_eq!(config.store.mailbox, 16);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "okashi=debug");
    assert!(config.logging.stderr);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "okashi.yaml", "api:\n  max: 20\n  apikey: file-key\n");

    let config = temp_env::with_vars(
        [
            ("OKASHI__API__MAX", Some("5")),
            ("OKASHI__API__APIKEY", Some("env-key")),
        ],
        || {
            OkashiConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load okashi config")
        },
    );

    assert_eq!(config.api.max, 5);
    assert_eq!(config.api.apikey, "env-key");
}

#[test]
#[serial]
fn invalid_endpoint_is_rejected() {
    let res = OkashiConfigLoader::new()
        .with_yaml_str("api:\n  endpoint: \"not a url\"\n")
        .load();
    assert!(res.is_err());
}
