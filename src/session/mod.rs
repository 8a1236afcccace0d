//! Session orchestration: debounce, settings, and the detection pipeline

pub mod debounce;
pub mod pipeline;
pub mod settings;

pub use debounce::DebounceScheduler;
pub use pipeline::DetectionPipeline;
pub use settings::{LabelSettings, MemorySettingsStore, SettingsStore, TomlSettingsStore};
