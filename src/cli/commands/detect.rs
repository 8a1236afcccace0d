//! Detect command implementation
//!
//! Runs the full detection pass: remote call, local augmentation, merge.
//! With --fake, asks the service for a redacted rendition instead.

use crate::cli::commands::read_input;
use crate::config::{load_config, WardenConfig};
use crate::detection::merger::DetectionMerger;
use crate::domain::entity::{DetectionResult, DetectionSource};
use crate::remote::client::{HttpRemoteDetector, RemoteDetector};
use crate::session::settings::{SettingsStore, TomlSettingsStore};
use clap::Args;
use std::path::Path;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Text to detect against
    #[arg(short, long)]
    pub text: Option<String>,

    /// File to detect against; stdin is used when neither --text nor --file
    /// is given
    #[arg(short, long)]
    pub file: Option<String>,

    /// Ask the service to replace detected PII with fake values
    #[arg(long)]
    pub fake: bool,

    /// Output format (table or json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let input = read_input(&self.text, &self.file)?;

        let config = if Path::new(config_path).exists() {
            load_config(config_path)?
        } else {
            crate::config::default_config()?
        };

        let detector = HttpRemoteDetector::new(&config.remote)?;
        tracing::info!(
            len = input.len(),
            base_url = detector.base_url(),
            fake = self.fake,
            "Running remote detection"
        );

        if self.fake {
            return self.execute_fake(&input, &config, &detector).await;
        }

        let merger = match config.detection.pattern_library {
            Some(ref path) => DetectionMerger::new(
                crate::detection::extractor::EntityExtractor::with_registry(
                    crate::detection::patterns::PatternRegistry::from_file(path)?,
                ),
                crate::detection::disambiguator::Disambiguator::new(),
            ),
            None => DetectionMerger::with_defaults()?,
        };

        let result = merger.detect(&input, &detector).await;
        self.print_result(&result)?;
        Ok(0)
    }

    async fn execute_fake(
        &self,
        input: &str,
        config: &WardenConfig,
        detector: &HttpRemoteDetector,
    ) -> anyhow::Result<i32> {
        let store = TomlSettingsStore::new(&config.application.settings_path);
        let labels = store.load()?;

        match detector.replace_with_fake(input, &labels).await {
            Ok(detection) => {
                println!("{}", detection.anonymized_text);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Redaction request failed");
                eprintln!("Error: {e}");
                Ok(3)
            }
        }
    }

    fn print_result(&self, result: &DetectionResult) -> anyhow::Result<()> {
        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(());
        }

        let source = match result.source {
            DetectionSource::Remote => "remote + local merge",
            DetectionSource::LocalFallback => "local fallback (remote unavailable)",
        };
        println!("Source: {source}");
        println!("{} entities detected:", result.entities.len());
        for entity in &result.entities {
            println!(
                "  {:<16} {:>6}..{:<6} {}",
                entity.entity_type.label(),
                entity.start,
                entity.end,
                entity.span(&result.original_text)
            );
        }
        Ok(())
    }
}
