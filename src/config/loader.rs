//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::WardenConfig;
use crate::domain::errors::WardenError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WardenConfig
/// 4. Applies environment variable overrides (PIIWARDEN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, TOML parsing fails, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<WardenConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WardenError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WardenError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: WardenConfig = toml::from_str(&contents)
        .map_err(|e| WardenError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        WardenError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Built-in defaults with environment overrides applied, for running without
/// a configuration file
pub fn default_config() -> Result<WardenConfig> {
    let mut config = WardenConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        WardenError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Referencing an unset variable is an
/// error.
fn substitute_env_vars(input: &str) -> Result<String> {
    // The pattern is fixed, compilation cannot fail
    let re = match Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
        Ok(re) => re,
        Err(e) => return Err(WardenError::Configuration(e.to_string())),
    };
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(WardenError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PIIWARDEN_* prefix
///
/// Variables follow the pattern PIIWARDEN_<SECTION>_<KEY>, for example
/// PIIWARDEN_REMOTE_BASE_URL or PIIWARDEN_DETECTION_DEBOUNCE_MS.
fn apply_env_overrides(config: &mut WardenConfig) {
    if let Ok(val) = std::env::var("PIIWARDEN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PIIWARDEN_APPLICATION_SETTINGS_PATH") {
        config.application.settings_path = val;
    }

    if let Ok(val) = std::env::var("PIIWARDEN_REMOTE_BASE_URL") {
        config.remote.base_url = val;
    }
    if let Ok(val) = std::env::var("PIIWARDEN_REMOTE_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.remote.timeout_seconds = seconds;
        }
    }

    if let Ok(val) = std::env::var("PIIWARDEN_DETECTION_DEBOUNCE_MS") {
        if let Ok(ms) = val.parse() {
            config.detection.debounce_ms = ms;
        }
    }
    if let Ok(val) = std::env::var("PIIWARDEN_DETECTION_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(val);
    }

    if let Ok(val) = std::env::var("PIIWARDEN_HIGHLIGHT_DISPLAY_DURATION_MS") {
        if let Ok(ms) = val.parse() {
            config.highlight.display_duration_ms = ms;
        }
    }

    if let Ok(val) = std::env::var("PIIWARDEN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PIIWARDEN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PIIWARDEN_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
[remote]
base_url = "http://localhost:9000"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.remote.base_url, "http://localhost:9000");
        assert_eq!(config.detection.debounce_ms, 300);
        assert_eq!(config.highlight.display_duration_ms, 5000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config("/nonexistent/piiwarden.toml").is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PIIWARDEN_TEST_DETECT_URL", "http://detect.internal");
        let file = write_config(
            r#"
[remote]
base_url = "${PIIWARDEN_TEST_DETECT_URL}"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.remote.base_url, "http://detect.internal");
        std::env::remove_var("PIIWARDEN_TEST_DETECT_URL");
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        let file = write_config(
            r#"
[remote]
base_url = "${PIIWARDEN_TEST_UNSET_VAR}"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("PIIWARDEN_TEST_UNSET_VAR"));
    }

    #[test]
    fn test_substitution_skips_comments() {
        let file = write_config(
            r#"
# base_url = "${PIIWARDEN_TEST_COMMENTED_VAR}"
[remote]
base_url = "http://localhost:8000"
"#,
        );
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let file = write_config(
            r#"
[detection]
debounce_ms = 0
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_default_config_valid() {
        assert!(default_config().is_ok());
    }
}
