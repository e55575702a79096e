//! Tests for `error` module

use super::error::*;

#[test]
fn test_error_codes_are_unique() {
    // Arrange
    let errors: Vec<Error> = vec![
        Error::StructuralInvariant("test".into()),
        Error::UnsupportedConversion { row: 3, value: 0.5 },
        Error::Persistence("test".into()),
        Error::CorruptChunk("test".into()),
        Error::Config("test".into()),
        Error::Internal("test".into()),
    ];

    // Act
    let codes: Vec<&str> = errors.iter().map(Error::code).collect();

    // Assert
    let mut unique_codes = codes.clone();
    unique_codes.sort_unstable();
    unique_codes.dedup();
    assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");

    for code in &codes {
        assert!(code.starts_with("NCHK-"), "Code {code} should start with NCHK-");
    }
}

#[test]
fn test_error_display_includes_code() {
    let err = Error::StructuralInvariant("chunk 7 is full".into());

    let display = format!("{err}");

    assert!(display.contains("[NCHK-001]"));
    assert!(display.contains("chunk 7 is full"));
}

#[test]
fn test_unsupported_conversion_display() {
    let err = Error::UnsupportedConversion { row: 2, value: 0.34 };

    let display = err.to_string();

    assert!(display.contains("row 2"));
    assert!(display.contains("0.34"));
}

#[test]
fn test_is_recoverable() {
    assert!(!Error::StructuralInvariant("x".into()).is_recoverable());
    assert!(!Error::CorruptChunk("x".into()).is_recoverable());
    assert!(!Error::Internal("x".into()).is_recoverable());

    assert!(Error::Persistence("x".into()).is_recoverable());
    assert!(Error::UnsupportedConversion { row: 0, value: 1.5 }.is_recoverable());
    assert!(Error::Config("x".into()).is_recoverable());
}

#[test]
fn test_config_error_converts() {
    let err: Error = crate::config::ConfigError::ParseError("bad toml".into()).into();

    assert_eq!(err.code(), "NCHK-005");
    assert!(err.to_string().contains("bad toml"));
}
