//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Settings Path: {}", config.application.settings_path);
        println!("  Detection Service: {}", config.remote.base_url);
        println!("  Request Timeout: {}s", config.remote.timeout_seconds);
        println!("  Debounce: {}ms", config.detection.debounce_ms);
        println!(
            "  Pattern Library: {}",
            config
                .detection
                .pattern_library
                .as_deref()
                .unwrap_or("(built-in)")
        );
        println!(
            "  Highlight Duration: {}ms",
            config.highlight.display_duration_ms
        );
        println!("  File Logging: {}", config.logging.local_enabled);

        Ok(0)
    }
}
