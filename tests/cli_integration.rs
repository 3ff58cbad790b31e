//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

use wordwar::cli::{parse_args_from, Args};
use wordwar::config::Config;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("wordwar")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.host.is_none());
    assert!(result.port.is_none());
    assert!(!result.no_auth);
    assert!(result.config.is_none());
    assert!(result.api_key.is_none());
    assert!(result.tick_secs.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-H",
        "0.0.0.0",
        "-p",
        "8080",
        "-k",
        "my-api-key",
        "-l",
        "debug",
        "-t",
        "5",
    ]))
    .unwrap();

    assert_eq!(result.host.unwrap().to_string(), "0.0.0.0");
    assert_eq!(result.port, Some(8080));
    assert_eq!(result.api_key, Some("my-api-key".to_string()));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert_eq!(result.tick_secs, Some(5));
    assert!(!result.no_auth);
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/wordwar.json"])).unwrap();

    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/wordwar.json"
    );
}

#[test]
fn test_cli_invalid_values() {
    assert!(parse_args_from(args(&["-p", "not-a-number"])).is_err());
    assert!(parse_args_from(args(&["-H", "not-an-ip"])).is_err());
    assert!(parse_args_from(args(&["--tick-secs", "0"])).is_err());
    assert!(parse_args_from(args(&["--unknown"])).is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let file = config_file(
        r#"{
        "server": {
            "host": "192.168.1.100",
            "port": 9000,
            "graceful_shutdown": false
        },
        "security": {
            "auth": {
                "enabled": true,
                "api_keys": ["key1", "key2"]
            }
        },
        "wars": {
            "max_countdown": 30,
            "default_countdown": 2,
            "tick_secs": 10,
            "command_prefix": "?",
            "admins": ["root"]
        },
        "logging": {
            "level": "debug"
        }
    }"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.host, "192.168.1.100");
    assert_eq!(config.server.port, 9000);
    assert!(!config.server.graceful_shutdown);
    assert!(config.security.auth.enabled);
    assert_eq!(config.security.auth.api_keys.len(), 2);
    assert_eq!(config.logging.level, "debug");

    let settings = config.war_settings();
    assert_eq!(settings.limits.max_countdown, 30);
    assert_eq!(settings.limits.default_countdown, 2);
    assert_eq!(settings.tick, Duration::from_secs(10));
    assert_eq!(settings.command_prefix, "?");
    assert_eq!(settings.admins, vec!["root"]);
}

#[test]
fn test_config_priority_cli_over_file() {
    let file = config_file(
        r#"{
        "server": {
            "host": "10.0.0.1",
            "port": 5000
        },
        "wars": {
            "tick_secs": 30
        }
    }"#,
    );

    let args = Args {
        host: Some("192.168.1.1".parse().unwrap()),
        port: Some(8080),
        tick_secs: Some(1),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.server.host, "192.168.1.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.wars.tick_secs, 1);
}

#[test]
fn test_config_file_kept_without_cli_values() {
    let file = config_file(r#"{"server": {"port": 5000}}"#);

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert_eq!(config.server.port, 5000);
}

#[test]
fn test_config_api_key_enables_auth() {
    let args = Args {
        api_key: Some("secret-key".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert!(config.security.auth.enabled);
    assert!(config
        .security
        .auth
        .api_keys
        .contains(&"secret-key".to_string()));
}

#[test]
fn test_config_no_auth_disables() {
    let file = config_file(
        r#"{
        "security": {
            "auth": {
                "enabled": true,
                "api_keys": ["key1"]
            }
        }
    }"#,
    );

    let args = Args {
        config: Some(file.path().to_path_buf()),
        no_auth: true,
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // --no-auth wins over the file
    assert!(!config.security.auth.enabled);
}

#[test]
fn test_config_rejects_inconsistent_countdowns() {
    let file = config_file(r#"{"wars": {"max_countdown": 3, "default_countdown": 5}}"#);

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}

#[test]
fn test_config_to_server_config() {
    let args = Args {
        host: Some("0.0.0.0".parse().unwrap()),
        port: Some(8080),
        api_key: Some("test-key".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let server_config = config.to_server_config().unwrap();

    assert_eq!(server_config.bind_address(), "0.0.0.0:8080");
    assert!(server_config.auth.enabled);
    assert!(server_config.key_store().is_valid("test-key"));
}

#[test]
fn test_config_missing_file() {
    let args = Args {
        config: Some("/nonexistent/wordwar.json".into()),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}
