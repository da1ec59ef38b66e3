use hook_config::{DEFAULT_EMAIL, DEFAULT_INIT_URL, HookConfigLoader};
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
fn file_values_are_merged_over_defaults() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "mutual-hook.yaml",
        r#"
identity:
  name: "Ada Lovelace"
  reg_no: "REG00001"
submission:
  max_attempts: 2
http:
  timeout_secs: 9
"#,
    );

    let config = HookConfigLoader::new().with_file(p).load().expect("load");

    assert_eq!(config.identity.name, "Ada Lovelace");
    assert_eq!(config.identity.reg_no, "REG00001");
    assert_eq!(config.identity.email, DEFAULT_EMAIL);
    assert_eq!(config.endpoint.init_url, DEFAULT_INIT_URL);
    assert_eq!(config.submission.max_attempts, 2);
    assert_eq!(config.submission.retry_delay_ms, 1000);
    assert_eq!(config.http.timeout().map(|d| d.as_secs()), Some(9));
}

#[test]
#[serial]
fn env_overrides_file_and_expands_placeholders() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "mutual-hook.yaml",
        r#"
identity:
  reg_no: "REG00001"
  email: "${HOOK_TEST_EMAIL}"
submission:
  max_attempts: 2
"#,
    );

    temp_env::with_vars(
        [
            ("HOOK__IDENTITY__REG_NO", Some("REG55555")),
            ("HOOK__SUBMISSION__MAX_ATTEMPTS", Some("7")),
            ("HOOK_TEST_EMAIL", Some("ada@example.com")),
        ],
        || {
            let config = HookConfigLoader::new().with_file(&p).load().expect("load");
            assert_eq!(config.identity.reg_no, "REG55555");
            assert_eq!(config.identity.email, "ada@example.com");
            assert_eq!(config.submission.max_attempts, 7);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = HookConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.submission.max_attempts, 4);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = HookConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn zero_attempts_fails_validation() {
    let result = HookConfigLoader::new()
        .with_yaml_str("submission:\n  max_attempts: 0\n")
        .load();
    assert!(result.is_err());
}
