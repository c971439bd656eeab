//! Configuration management for the GreenRoute map client
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::GreenRouteError;
use crate::map::{MapOptions, Viewport};
use crate::resolver::ResolutionOrdering;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Single variable the backend base URL has always been read from
pub const BASE_URL_ENV: &str = "GREENROUTE_API_BASE_URL";
const DIRECTIONS_KEY_ENV: &str = "GRAPHHOPPER_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreenRouteConfig {
    /// Route backend configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Directions provider configuration
    #[serde(default)]
    pub directions: DirectionsConfig,
    /// Map behaviour
    #[serde(default)]
    pub map: MapConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Route backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all backend endpoints hang off
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Directions provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    #[serde(default = "default_directions_base_url")]
    pub base_url: String,
    /// API key; falls back to `GRAPHHOPPER_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub resolution_ordering: ResolutionOrdering,
    #[serde(default = "default_center_latitude")]
    pub default_center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub default_center_longitude: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_directions_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_center_latitude() -> f64 {
    37.7749
}

fn default_center_longitude() -> f64 {
    -122.4194
}

fn default_zoom() -> u8 {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_directions_base_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl DirectionsConfig {
    /// Configured key, or the one from the environment
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env::var(DIRECTIONS_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            resolution_ordering: ResolutionOrdering::default(),
            default_center_latitude: default_center_latitude(),
            default_center_longitude: default_center_longitude(),
            default_zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport {
            center: crate::models::GeoPoint::new(
                self.default_center_latitude,
                self.default_center_longitude,
            ),
            zoom: self.default_zoom,
        }
    }

    /// Options a freshly mounted map starts with
    #[must_use]
    pub fn options(&self) -> MapOptions {
        MapOptions {
            viewport: self.viewport(),
            ..MapOptions::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GreenRouteConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GREENROUTE_API__BASE_URL style overrides
        builder = builder.add_source(
            Environment::with_prefix("GREENROUTE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GreenRouteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                config.api.base_url = base_url;
            }
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("greenroute").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_timeout();
        }
        if self.directions.base_url.is_empty() {
            self.directions.base_url = default_directions_base_url();
        }
        if self.directions.timeout_seconds == 0 {
            self.directions.timeout_seconds = default_timeout();
        }
        if self.map.default_zoom == 0 {
            self.map.default_zoom = default_zoom();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("API", &self.api.base_url),
            ("Directions", &self.directions.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GreenRouteError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(GreenRouteError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.directions.timeout_seconds > 300 {
            return Err(
                GreenRouteError::config("Directions timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(-90.0..=90.0).contains(&self.map.default_center_latitude)
            || !(-180.0..=180.0).contains(&self.map.default_center_longitude)
        {
            return Err(GreenRouteError::config("Default map center is out of range").into());
        }

        if self.map.default_zoom > 22 {
            return Err(GreenRouteError::config("Default zoom cannot exceed 22").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GreenRouteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GreenRouteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GreenRouteConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.directions.base_url, "https://graphhopper.com/api/1");
        assert_eq!(config.map.resolution_ordering, ResolutionOrdering::Sequenced);
        assert_eq!(config.map.viewport(), Viewport::default());
        assert_eq!(config.map.options(), MapOptions::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::bad_level(|c: &mut GreenRouteConfig| c.logging.level = "loud".into(), "Invalid log level")]
    #[case::bad_format(|c: &mut GreenRouteConfig| c.logging.format = "xml".into(), "Invalid log format")]
    #[case::bad_url(|c: &mut GreenRouteConfig| c.api.base_url = "localhost:8080".into(), "API base URL")]
    #[case::slow_api(|c: &mut GreenRouteConfig| c.api.timeout_seconds = 500, "API timeout cannot exceed")]
    #[case::zoom(|c: &mut GreenRouteConfig| c.map.default_zoom = 30, "zoom cannot exceed")]
    #[case::center(|c: &mut GreenRouteConfig| c.map.default_center_latitude = 91.0, "out of range")]
    fn test_config_validation_failures(
        #[case] mutate: fn(&mut GreenRouteConfig),
        #[case] expected: &str,
    ) {
        let mut config = GreenRouteConfig::default();
        mutate(&mut config);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(expected));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = GreenRouteConfig::default();
        config.api.base_url.clear();
        config.api.timeout_seconds = 0;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("greenroute-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://routes.example.com/api/v1"

[map]
resolution_ordering = "last_callback_wins"
default_zoom = 9
"#
        )
        .unwrap();

        let config = GreenRouteConfig::load_from_path(Some(path)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        if env::var(BASE_URL_ENV).is_err() {
            assert_eq!(config.api.base_url, "https://routes.example.com/api/v1");
        }
        assert_eq!(
            config.map.resolution_ordering,
            ResolutionOrdering::LastCallbackWins
        );
        assert_eq!(config.map.default_zoom, 9);
        assert_eq!(config.directions.timeout_seconds, 30);
    }

    #[test]
    fn test_directions_key_prefers_config() {
        let config = DirectionsConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GreenRouteConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("greenroute"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
