mod support;

use std::io::Write;
use std::path::PathBuf;

use course_gate::config::{ConfigError, ServerConfig, CONFIG_ENV, FIXTURES_ENV, TOKEN_ADDRESS_ENV};
use support::with_scoped_env;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("course-gate.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn test_from_file_overrides_defaults() {
    let (dir, path) = write_config(
        r#"
[server]
port = 9100
countdown_interval_ms = 250

[chain]
fixtures = "data/courses.json"
"#,
    );

    let config = ServerConfig::from_file(&path).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9100);
    assert_eq!(config.countdown_interval_ms, 250);
    assert_eq!(config.fixtures, Some(dir.path().join("data/courses.json")));
}

#[test]
fn test_absolute_fixture_path_is_kept() {
    let (_dir, path) = write_config("[chain]\nfixtures = \"/srv/courses.json\"\n");
    let config = ServerConfig::from_file(&path).unwrap();
    assert_eq!(config.fixtures, Some(PathBuf::from("/srv/courses.json")));
}

#[test]
fn test_token_address_from_file() {
    let (_dir, path) = write_config(
        "[chain]\ntoken_address = \"0x00000000000000000000000000000000000ED0C0\"\n",
    );
    let config = ServerConfig::from_file(&path).unwrap();
    assert_eq!(
        config.token_address.as_deref(),
        Some("0x00000000000000000000000000000000000ED0C0")
    );

    let (_dir, path) = write_config("[chain]\ntoken_address = \"EDU\"\n");
    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("token_address"));
}

#[test]
fn test_from_file_rejects_bad_toml() {
    let (_dir, path) = write_config("[server]\nport = \"not a number\"\n");
    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_from_file_rejects_zero_interval() {
    let (_dir, path) = write_config("[server]\ncountdown_interval_ms = 0\n");
    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("countdown_interval_ms"));
}

#[test]
fn test_missing_file_is_read_error() {
    let err = ServerConfig::from_file("/nonexistent/course-gate.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_load_env_beats_file() {
    let (_dir, path) = write_config("[server]\nhost = \"10.0.0.1\"\nport = 9000\n");
    let path_str = path.to_string_lossy().into_owned();

    let config = with_scoped_env(
        &[
            (CONFIG_ENV, Some(path_str.as_str())),
            ("HOST", None),
            ("PORT", Some("9200")),
            (FIXTURES_ENV, Some("/tmp/fixtures.json")),
            (TOKEN_ADDRESS_ENV, None),
        ],
        ServerConfig::load,
    )
    .unwrap();

    assert_eq!(config.bind_address(), "10.0.0.1:9200");
    assert_eq!(config.fixtures, Some(PathBuf::from("/tmp/fixtures.json")));
    assert_eq!(config.token_address, None);
}

#[test]
fn test_load_rejects_bad_port() {
    let (_dir, path) = write_config("");
    let path_str = path.to_string_lossy().into_owned();

    let result = with_scoped_env(
        &[(CONFIG_ENV, Some(path_str.as_str())), ("PORT", Some("99999"))],
        ServerConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
