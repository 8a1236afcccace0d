//! Configuration schema types

use serde::{Deserialize, Serialize};
use url::Url;

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WardenConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote detection service configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Highlight settings
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.remote.validate()?;
        self.detection.validate()?;
        self.highlight.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path of the label settings file
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            settings_path: default_settings_path(),
        }
    }
}

/// Remote detection service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the detection service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default)]
    pub timeout_seconds: u64,
}

impl RemoteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("remote.base_url cannot be empty".to_string());
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("remote.base_url is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("remote.base_url must start with http:// or https://".to_string());
        }
        Ok(())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: 0,
        }
    }
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Quiet period after the last keystroke before detection runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Optional TOML pattern library path; the built-in library is used
    /// when unset
    #[serde(default)]
    pub pattern_library: Option<String>,
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.debounce_ms == 0 {
            return Err("detection.debounce_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            pattern_library: None,
        }
    }
}

/// Highlight settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// How long highlights stay visible, in milliseconds
    #[serde(default = "default_display_duration_ms")]
    pub display_duration_ms: u64,
}

impl HighlightConfig {
    fn validate(&self) -> Result<(), String> {
        if self.display_duration_ms == 0 {
            return Err("highlight.display_duration_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            display_duration_ms: default_display_duration_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_settings_path() -> String {
    "piiwarden_settings.toml".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_display_duration_ms() -> u64 {
    5000
}

fn default_local_path() -> String {
    "logs/piiwarden.log".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
