// PII Warden - PII detection and highlighting engine
// Copyright (c) 2026 PII Warden Contributors
// Licensed under the MIT License

//! # PII Warden - PII detection and highlighting
//!
//! PII Warden detects personally identifiable information in text as it is
//! typed and maps the findings back onto the originating UI surface as
//! positioned highlight regions. A remote detection service provides the
//! high-accuracy baseline; a local regex pattern library augments it and
//! takes over entirely when the service is unreachable.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Pattern library, extraction, disambiguation, merging
//! - [`remote`] - Detection service HTTP client
//! - [`highlight`] - Surface abstraction, placement, overlay lifecycle
//! - [`session`] - Debounce, label settings, the detection pipeline
//! - [`domain`] - Core domain types, errors, and events
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use piiwarden::detection::merger::DetectionMerger;
//! use piiwarden::remote::client::HttpRemoteDetector;
//! use piiwarden::config::RemoteConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let detector = HttpRemoteDetector::new(&RemoteConfig::default())?;
//!     let merger = DetectionMerger::with_defaults()?;
//!
//!     let result = merger.detect("my NRIC is S1234567D", &detector).await;
//!     println!("{} entities detected", result.entities.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod highlight;
pub mod logging;
pub mod remote;
pub mod session;

pub use domain::errors::WardenError;
pub use domain::result::Result;
