//! Configuration loading and schema

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config};
pub use schema::{
    ApplicationConfig, DetectionConfig, HighlightConfig, LoggingConfig, RemoteConfig,
    WardenConfig,
};
