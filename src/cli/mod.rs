//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PII Warden using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PII Warden - PII detection and highlighting engine
#[derive(Parser, Debug)]
#[command(name = "piiwarden")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "piiwarden.toml", env = "PIIWARDEN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PIIWARDEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan text with the local pattern library only
    Scan(commands::scan::ScanArgs),

    /// Run a full detection pass against the remote service
    Detect(commands::detect::DetectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
