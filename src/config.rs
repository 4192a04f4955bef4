use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ParsePalError;
use crate::extractor::TimestampUnits;
use crate::models::AppKind;
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub app: String,
    pub millis_above: i64,
    pub seconds_above: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        let units = TimestampUnits::default();
        Self {
            extraction: ExtractionConfig {
                app: AppKind::WhatsApp.to_string(),
                millis_above: units.millis_above,
                seconds_above: units.seconds_above,
            },
            discovery: DiscoveryConfig {
                extension: "db".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl ExtractionConfig {
    /// Timestamp thresholds for the extractor
    #[must_use]
    pub const fn timestamp_units(&self) -> TimestampUnits {
        TimestampUnits {
            millis_above: self.millis_above,
            seconds_above: self.seconds_above,
        }
    }

    /// Configured application
    pub fn app_kind(&self) -> Result<AppKind> {
        Ok(self.app.parse()?)
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local`, the explicit file (if
    /// any), then `PARSEPAL__SECTION__KEY` environment variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize default configuration: {}", e))?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("PARSEPAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate extraction config
        self.extraction
            .app_kind()
            .map_err(|e| invalid(format!("Invalid extraction app: {e}")))?;
        if self.extraction.seconds_above <= 0 {
            return Err(invalid("seconds_above must be greater than 0".to_string()));
        }
        if self.extraction.millis_above <= self.extraction.seconds_above {
            return Err(invalid("millis_above must be greater than seconds_above".to_string()));
        }

        // Validate discovery config
        InputValidator::validate_extension(&self.discovery.extension)?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(invalid(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

fn invalid(message: String) -> anyhow::Error {
    ParsePalError::InvalidConfig(message).into()
}
