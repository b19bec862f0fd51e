use std::time::Duration;

use matchday::config::{Config, ConfigError, ConfigStore};

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.api.connect_timeout_seconds, 5);

    assert_eq!(config.query.stale_time_seconds, 0);
    assert!(!config.query.never_stale);
    assert!(config.query.refetch_on_focus);
    assert_eq!(config.query.blog_preview_limit, 3);

    assert_eq!(config.session.restore_user_id, None);
}

/// Test that Config::config_path() returns a path ending with the
/// expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("matchday/config.toml"));
}

/// Test that a missing file yields the default config.
#[test]
fn test_missing_file_yields_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let config = Config::load_from(&path).expect("missing file is fine");
    assert_eq!(config.api.base_url, Config::default().api.base_url);
}

/// Test that valid TOML parses correctly.
#[test]
fn test_parse_valid_toml() {
    let toml_content = r#"
[api]
base_url = "https://club.example.com"
timeout_seconds = 10

[query]
stale_time_seconds = 300
blog_preview_limit = 5

[session]
restore_user_id = 2
"#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");
    assert_eq!(config.api.base_url, "https://club.example.com");
    assert_eq!(config.api.timeout_seconds, 10);
    // Unset fields keep their defaults.
    assert_eq!(config.api.connect_timeout_seconds, 5);
    assert_eq!(config.query.stale_time_seconds, 300);
    assert_eq!(config.query.blog_preview_limit, 5);
    assert_eq!(config.session.restore_user_id, Some(2));
}

/// Test that invalid TOML produces a parse error.
#[test]
fn test_parse_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml [[[").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// Test validation fails for a base URL that does not speak HTTP.
#[test]
fn test_validation_rejects_bad_scheme() {
    let mut config = Config::default();
    config.api.base_url = "ftp://club.example.com".to_string();

    let result = config.validate();
    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("http"), "got: {message}");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

/// Test validation fails for zero timeouts.
#[test]
fn test_validation_rejects_zero_timeout() {
    let mut config = Config::default();
    config.api.timeout_seconds = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.api.connect_timeout_seconds = 0;
    assert!(config.validate().is_err());
}

/// Test validation fails for a zero blog preview limit.
#[test]
fn test_validation_rejects_zero_blog_limit() {
    let mut config = Config::default();
    config.query.blog_preview_limit = 0;

    let result = config.validate();
    match result.unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("Blog"), "got: {message}");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

/// Test round-trip serialization/deserialization.
#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let deserialized: Config = toml::from_str(&serialized).expect("Should deserialize");

    assert_eq!(original.api.base_url, deserialized.api.base_url);
    assert_eq!(original.query.stale_time_seconds, deserialized.query.stale_time_seconds);
    assert_eq!(
        original.query.blog_preview_limit,
        deserialized.query.blog_preview_limit
    );
}

/// Test the real user flow: write TOML, load, validate.
#[test]
fn test_load_from_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "http://127.0.0.1:9999"

[query]
never_stale = true
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).expect("should load");
    assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
    assert!(config.query.never_stale);
}

/// Test that a file failing validation is rejected on load.
#[test]
fn test_load_from_rejects_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "not-a-url"
"#,
    )
    .unwrap();

    let result = Config::load_from(&path);
    assert!(result.is_err(), "should reject a bad base URL");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("http"), "got: {err}");
}

/// Test the query section maps onto observer options.
#[test]
fn test_query_options_mapping() {
    let mut config = Config::default();
    config.query.stale_time_seconds = 300;
    let options = config.query.options();
    assert_eq!(options.stale_time, Duration::from_secs(300));
    assert!(options.refetch_on_focus);

    config.query.never_stale = true;
    config.query.refetch_on_focus = false;
    let options = config.query.options();
    assert_eq!(options.stale_time, Duration::MAX);
    assert!(!options.refetch_on_focus);
}

/// Test that reload swaps the stored config and keeps it on failure.
#[test]
fn test_store_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"http://one.example.com\"\n").unwrap();

    let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());
    assert_eq!(store.get().api.base_url, "http://one.example.com");

    std::fs::write(&path, "[api]\nbase_url = \"http://two.example.com\"\n").unwrap();
    store.reload().expect("reload");
    assert_eq!(store.get().api.base_url, "http://two.example.com");

    std::fs::write(&path, "[api]\nbase_url = \"broken\"\n").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.get().api.base_url, "http://two.example.com");
}
