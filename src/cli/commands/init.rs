//! Init command implementation
//!
//! Generates a starter configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "piiwarden.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point remote.base_url at your detection service");
                println!("  3. Validate configuration: piiwarden validate-config");
                println!("  4. Try it: piiwarden scan --text \"my email is a@b.com\"");
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_config() -> String {
        r#"# PII Warden Configuration File

[application]
log_level = "info"
settings_path = "piiwarden_settings.toml"

[remote]
# Base URL of the PII detection service
base_url = "http://localhost:8000"
# Request timeout in seconds; 0 disables the timeout
timeout_seconds = 0

[detection]
# Quiet period after the last keystroke before detection runs
debounce_ms = 300
# Optional custom pattern library; the built-in library is used when unset
# pattern_library = "patterns/pii_patterns.toml"

[highlight]
# How long highlights stay visible
display_duration_ms = 5000

[logging]
local_enabled = false
local_path = "logs/piiwarden.log"
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_and_validates() {
        let content = InitArgs::generate_config();
        let config: crate::config::WardenConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.debounce_ms, 300);
    }
}
