//! Remote detection service integration

pub mod client;
pub mod models;

pub use client::{HttpRemoteDetector, RemoteDetector};
pub use models::{RemoteDetection, RemoteEntity};
