//! Input validation for user-supplied query parameters and paths.

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Date format accepted for filter bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input validator for query inputs
pub struct InputValidator;

impl InputValidator {
    /// Parse a date bound typed by the user.
    ///
    /// Blank input means "no bound" and yields `Ok(None)`. The error carries the
    /// trimmed offending text.
    pub fn parse_date_bound(input: &str) -> std::result::Result<Option<NaiveDate>, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Some)
            .map_err(|_| trimmed.to_string())
    }

    /// Validate a database path before extraction
    pub fn validate_database_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!("Database path does not exist: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow!("Database path is not a file: {}", path.display()));
        }

        Ok(())
    }

    /// Validate a file extension used for database discovery
    pub fn validate_extension(extension: &str) -> Result<()> {
        let ext = extension.trim().trim_start_matches('.');
        if ext.is_empty() {
            return Err(anyhow!("File extension cannot be empty"));
        }

        if !ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(anyhow!("File extension contains invalid characters: {extension}"));
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
