#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use multimatic_config::{ConfigError, load_config_from, profile_to_client_config};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_profiles_from_toml() {
    let file = write_config(
        r#"
default_profile = "home"

[defaults]
timeout = 12

[profiles.home]
username = "user@example.com"
password = "hunter2"
smartphone_id = "phone-1"
facility = "21223900"
base_url = "http://127.0.0.1:8080/mobile/api/v4/"
"#,
    );

    let config = load_config_from(file.path()).unwrap();
    assert_eq!(config.default_profile.as_deref(), Some("home"));
    assert_eq!(config.defaults.timeout, 12);

    let (name, profile) = config.profile(None).unwrap();
    assert_eq!(name, "home");
    assert_eq!(profile.facility.as_deref(), Some("21223900"));

    let client = profile_to_client_config(profile, &name, config.defaults.timeout).unwrap();
    assert_eq!(client.credentials.username, "user@example.com");
    assert_eq!(client.credentials.smartphone_id, "phone-1");
    assert_eq!(client.base_url.as_str(), "http://127.0.0.1:8080/mobile/api/v4/");
    assert_eq!(client.timeout, Duration::from_secs(12));
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.timeout, 30);
    assert!(config.profiles.is_empty());
}

#[test]
fn profile_timeout_and_smartphone_default() {
    let file = write_config(
        r#"
[profiles.default]
username = "user@example.com"
password = "hunter2"
timeout = 5
"#,
    );

    let config = load_config_from(file.path()).unwrap();
    let (name, profile) = config.profile(None).unwrap();
    assert_eq!(profile.smartphone_id, "multimatic");

    let client = profile_to_client_config(profile, &name, config.defaults.timeout).unwrap();
    assert_eq!(client.timeout, Duration::from_secs(5));
}

#[test]
fn invalid_base_url_is_a_validation_error() {
    let file = write_config(
        r#"
[profiles.default]
username = "user@example.com"
password = "hunter2"
base_url = "not a url"
"#,
    );

    let config = load_config_from(file.path()).unwrap();
    let (name, profile) = config.profile(None).unwrap();
    let err = profile_to_client_config(profile, &name, 30).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
}

#[test]
fn malformed_toml_is_reported() {
    let file = write_config("profiles = 3\n");
    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Figment(_)));
}
