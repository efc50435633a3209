//! Configuration validation tests
//!
//! Tests that verify configuration defaults, derived values and startup validation.

use deluge_exporter::config::{log_directive, Config, DelugeConfig, ServerConfig};
use deluge_exporter::error::ExporterError;
use secrecy::{ExposeSecret, SecretString};

fn valid_deluge() -> DelugeConfig {
    DelugeConfig {
        url: Some("http://deluge:8112".to_string()),
        password: Some(SecretString::from("deluge")),
        ..Default::default()
    }
}

#[test]
fn test_default_server_config() {
    // Given: ServerConfig with default values
    let config = ServerConfig::default();

    // Then: Should bind all interfaces on the exporter's conventional port
    assert_eq!(config.addr, "0.0.0.0");
    assert_eq!(config.port, 8011);
}

#[test]
fn test_deluge_config_defaults() {
    let config = DelugeConfig::default();

    assert!(config.url.is_none());
    assert!(config.password.is_none());
    assert_eq!(config.timeout_seconds, 10);
    assert!(config.verify_ssl);
}

#[test]
fn test_missing_url_is_fatal() {
    // Given: A config without a Deluge URL
    let config = Config {
        deluge: DelugeConfig {
            url: None,
            ..valid_deluge()
        },
        ..Default::default()
    };

    // When: Validating
    let result = config.validate();

    // Then: The error names the missing variable
    match result {
        Err(ExporterError::Config(message)) => assert!(message.contains("DELUGE_URL")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_blank_url_is_fatal() {
    let config = Config {
        deluge: DelugeConfig {
            url: Some("   ".to_string()),
            ..valid_deluge()
        },
        ..Default::default()
    };

    assert!(matches!(config.validate(), Err(ExporterError::Config(_))));
}

#[test]
fn test_missing_password_is_fatal() {
    let config = Config {
        deluge: DelugeConfig {
            password: None,
            ..valid_deluge()
        },
        ..Default::default()
    };

    match config.validate() {
        Err(ExporterError::Config(message)) => assert!(message.contains("DELUGE_PASSWORD")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_valid_config_passes() {
    let config = Config {
        deluge: valid_deluge(),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
    assert_eq!(
        config.deluge.password().unwrap().expose_secret(),
        "deluge"
    );
}

#[test]
fn test_api_url_derivation() {
    let mut config = valid_deluge();
    assert_eq!(config.api_url().unwrap(), "http://deluge:8112/json");

    config.url = Some("https://seedbox.example.org/deluge/".to_string());
    assert_eq!(
        config.api_url().unwrap(),
        "https://seedbox.example.org/deluge/json"
    );
}

#[test]
fn test_log_directive_accepts_python_style_names() {
    assert_eq!(log_directive("INFO"), "info");
    assert_eq!(log_directive("DEBUG"), "debug");
    assert_eq!(log_directive("WARNING"), "warn");
    assert_eq!(log_directive("CRITICAL"), "error");
    assert_eq!(log_directive("error"), "error");
    assert_eq!(log_directive(""), "info");
}
