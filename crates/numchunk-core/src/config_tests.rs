//! Tests for config module

use crate::config::*;
use crate::encoding::ByteOrder;

// ========================================================================
// Defaults
// ========================================================================

#[test]
fn test_config_default_values() {
    let config = NumchunkConfig::default();

    assert_eq!(config.chunk.chunk_cap, DEFAULT_CHUNK_CAP);
    assert_eq!(config.chunk.byte_order, ByteOrder::Little);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_config_is_valid() {
    assert!(NumchunkConfig::default().validate().is_ok());
}

#[test]
fn test_byte_order_serialization() {
    let json = serde_json::to_string(&ByteOrder::Big).expect("serialize");
    let back: ByteOrder = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(json, "\"big\"");
    assert_eq!(back, ByteOrder::Big);
}

// ========================================================================
// TOML parsing
// ========================================================================

#[test]
fn test_from_toml_overrides_sections() {
    let toml_str = r#"
        [chunk]
        chunk_cap = 4096
        byte_order = "big"

        [logging]
        level = "debug"
    "#;

    let config = NumchunkConfig::from_toml(toml_str).expect("parse");

    assert_eq!(config.chunk.chunk_cap, 4096);
    assert_eq!(config.chunk.byte_order, ByteOrder::Big);
    assert_eq!(config.logging.level, "debug");
    // Untouched keys keep their defaults
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_from_toml_partial_keeps_defaults() {
    let config = NumchunkConfig::from_toml("[chunk]\nchunk_cap = 10\n").expect("parse");

    assert_eq!(config.chunk.chunk_cap, 10);
    assert_eq!(config.chunk.byte_order, ByteOrder::Little);
}

#[test]
fn test_from_toml_rejects_bad_type() {
    let result = NumchunkConfig::from_toml("[chunk]\nchunk_cap = \"lots\"\n");

    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let config =
        NumchunkConfig::load_from_path("/nonexistent/numchunk.toml").expect("defaults apply");

    assert_eq!(config.chunk.byte_order, ByteOrder::Little);
}

#[test]
fn test_to_toml_round_trip() {
    let mut config = NumchunkConfig::default();
    config.chunk.chunk_cap = 1234;
    config.chunk.byte_order = ByteOrder::Big;

    let text = config.to_toml().expect("serialize");
    let back = NumchunkConfig::from_toml(&text).expect("parse");

    assert_eq!(back.chunk, config.chunk);
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_validate_rejects_zero_cap() {
    let mut config = NumchunkConfig::default();
    config.chunk.chunk_cap = 0;

    let err = config.validate().unwrap_err();

    match err {
        ConfigError::InvalidValue { key, .. } => assert_eq!(key, "chunk.chunk_cap"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_rejects_cap_beyond_i32() {
    let mut config = NumchunkConfig::default();
    config.chunk.chunk_cap = i32::MAX as usize + 1;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_level() {
    let mut config = NumchunkConfig::default();
    config.logging.level = "verbose".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_log_format() {
    let mut config = NumchunkConfig::default();
    config.logging.format = "xml".to_string();

    assert!(config.validate().is_err());
}
