// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::Path;

use commitmoji::config::{Config, DEFAULT_BASE_URL};
use commitmoji::error::Error;

// ─── Default values ──────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let config = Config::default();
    assert_eq!(config.model, "gpt-4o-mini");
    assert!(config.api_key.is_none());
    assert!(config.base_url.is_none());
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert!((config.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.max_tokens, 256);
    assert_eq!(config.timeout_secs, 60);
    assert!(config.emoji);
    assert!(config.exclude.contains(&"Cargo.lock".to_string()));
    assert!(config.validate().is_ok());
}

// ─── TOML deserialization ────────────────────────────────────────────────────

#[test]
fn load_from_valid_toml() {
    let toml_str = r#"
model = "gpt-4o"
base_url = "http://localhost:8080/v1"
temperature = 0.7
max_tokens = 512
timeout_secs = 30
exclude = ["*.snap"]
emoji = false
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.base_url(), "http://localhost:8080/v1");
    assert_eq!(config.max_tokens, 512);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.exclude, vec!["*.snap".to_string()]);
    assert!(!config.emoji);
    assert!(config.validate().is_ok());
}

#[test]
fn load_partial_toml_uses_defaults() {
    let config: Config = toml::from_str(r#"model = "gpt-4.1""#).unwrap();
    assert_eq!(config.model, "gpt-4.1");
    assert_eq!(config.max_tokens, 256);
    assert_eq!(config.timeout_secs, 60);
    assert!(config.emoji);
}

#[test]
fn invalid_toml_returns_error() {
    let result: std::result::Result<Config, _> = toml::from_str("model = [invalid");
    assert!(result.is_err(), "invalid TOML should return an error");
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[test]
fn validate_rejects_out_of_range_values() {
    let cases = [
        Config {
            temperature: 2.5,
            ..Config::default()
        },
        Config {
            max_tokens: 8,
            ..Config::default()
        },
        Config {
            timeout_secs: 0,
            ..Config::default()
        },
        Config {
            model: "  ".into(),
            ..Config::default()
        },
        Config {
            base_url: Some("ftp://example.com".into()),
            ..Config::default()
        },
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(Error::Config(_))),
            "expected config error for {config:?}"
        );
    }
}

// ─── Credentials ─────────────────────────────────────────────────────────────

#[test]
fn configured_key_becomes_credential() {
    use secrecy::ExposeSecret;

    let config = Config {
        api_key: Some("sk-test".into()),
        ..Config::default()
    };
    let key = config.credential().unwrap();
    assert_eq!(key.expose_secret(), "sk-test");
}

// ─── Exclusion globs ─────────────────────────────────────────────────────────

#[test]
fn exclude_matches_full_path_globs() {
    let config = Config {
        exclude: vec!["docs/**/*.md".into()],
        ..Config::default()
    };
    let set = config.exclude_set().unwrap();
    assert!(Config::is_excluded(&set, Path::new("docs/guide/intro.md")));
    assert!(!Config::is_excluded(&set, Path::new("README.md")));
}

#[test]
fn empty_exclude_matches_nothing() {
    let config = Config {
        exclude: Vec::new(),
        ..Config::default()
    };
    let set = config.exclude_set().unwrap();
    assert!(!Config::is_excluded(&set, Path::new("Cargo.lock")));
}
