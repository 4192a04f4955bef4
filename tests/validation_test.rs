//! Unit tests for input validation

use chrono::NaiveDate;
use parsepal::validation::{InputValidator, DATE_FORMAT};

#[test]
fn test_date_format() {
    assert_eq!(DATE_FORMAT, "%Y-%m-%d");
}

#[test]
fn test_parse_date_bound_valid() {
    assert_eq!(
        InputValidator::parse_date_bound("2023-01-01"),
        Ok(NaiveDate::from_ymd_opt(2023, 1, 1))
    );
}

#[test]
fn test_parse_date_bound_blank_is_no_bound() {
    assert_eq!(InputValidator::parse_date_bound(""), Ok(None));
    assert_eq!(InputValidator::parse_date_bound(" \t"), Ok(None));
}

#[test]
fn test_parse_date_bound_rejects_other_formats() {
    assert_eq!(InputValidator::parse_date_bound("01/02/2023"), Err("01/02/2023".to_string()));
    assert_eq!(InputValidator::parse_date_bound(" next week "), Err("next week".to_string()));
    assert!(InputValidator::parse_date_bound("2023-13-01").is_err());
    assert!(InputValidator::parse_date_bound("2023-01-01T10:00:00").is_err());
}

#[test]
fn test_validate_database_path_existing_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert!(InputValidator::validate_database_path(file.path()).is_ok());
}

#[test]
fn test_validate_database_path_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = InputValidator::validate_database_path(&dir.path().join("msgstore.db")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_validate_database_path_directory() {
    let dir = tempfile::tempdir().unwrap();
    let err = InputValidator::validate_database_path(dir.path()).unwrap_err();
    assert!(err.to_string().contains("not a file"));
}

#[test]
fn test_validate_extension() {
    assert!(InputValidator::validate_extension("db").is_ok());
    assert!(InputValidator::validate_extension(".crypt14").is_ok());
    assert!(InputValidator::validate_extension("").is_err());
    assert!(InputValidator::validate_extension("*.db").is_err());
}

#[test]
fn test_sanitize_text() {
    assert_eq!(InputValidator::sanitize_text("  hello\0 world  "), "hello world");
    assert_eq!(InputValidator::sanitize_text("line1\nline2\tend"), "line1\nline2\tend");
    assert_eq!(InputValidator::sanitize_text("\u{7}"), "");
}
