//! Per-label redaction settings
//!
//! Users can switch individual entity labels out of redaction. The map is
//! sparse: a label missing from it is enabled. It scopes only the label set
//! sent on `replace_with_fake` requests; detection and highlighting always
//! cover every label. Settings survive restarts through a [`SettingsStore`];
//! the TOML-backed store is the default, tests substitute an in-memory one.

use crate::domain::entity::EntityType;
use crate::domain::errors::WardenError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Which entity labels the redaction endpoint may replace
///
/// Every label defaults to enabled; only explicit overrides are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSettings {
    overrides: HashMap<EntityType, bool>,
}

impl LabelSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a label is enabled; unset labels are enabled
    pub fn enabled(&self, entity_type: EntityType) -> bool {
        self.overrides.get(&entity_type).copied().unwrap_or(true)
    }

    /// Set one label's enablement
    pub fn set_enabled(&mut self, entity_type: EntityType, enabled: bool) {
        if enabled {
            // Back to the default, no need to store it
            self.overrides.remove(&entity_type);
        } else {
            self.overrides.insert(entity_type, false);
        }
    }

    /// Replace every override at once
    pub fn replace(&mut self, overrides: HashMap<EntityType, bool>) {
        self.overrides = overrides
            .into_iter()
            .filter(|(_, enabled)| !enabled)
            .collect();
    }

    /// Labels the currently enabled set allows
    pub fn enabled_types(&self) -> Vec<EntityType> {
        EntityType::ALL
            .iter()
            .copied()
            .filter(|t| self.enabled(*t))
            .collect()
    }

    /// Full wire-format map for the redaction endpoint, one entry per label
    pub fn to_wire_map(&self) -> HashMap<String, bool> {
        EntityType::ALL
            .iter()
            .map(|t| (t.label().to_string(), self.enabled(*t)))
            .collect()
    }
}

/// Persistence for [`LabelSettings`]
pub trait SettingsStore: Send + Sync {
    /// Load persisted settings; defaults when nothing was saved yet
    fn load(&self) -> Result<LabelSettings>;

    /// Persist the settings
    fn save(&self, settings: &LabelSettings) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    labels: LabelSettings,
}

/// TOML-file backed [`SettingsStore`]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<LabelSettings> {
        if !self.path.exists() {
            return Ok(LabelSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: SettingsFile = toml::from_str(&content)
            .map_err(|e| WardenError::Settings(format!("{}: {e}", self.path.display())))?;
        Ok(file.labels)
    }

    fn save(&self, settings: &LabelSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = SettingsFile {
            labels: settings.clone(),
        };
        let content = toml::to_string_pretty(&file)
            .map_err(|e| WardenError::Settings(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory [`SettingsStore`] for tests and ephemeral runs
#[derive(Default)]
pub struct MemorySettingsStore {
    settings: std::sync::Mutex<LabelSettings>,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<LabelSettings> {
        Ok(self
            .settings
            .lock()
            .map_err(|_| WardenError::Settings("settings lock poisoned".to_string()))?
            .clone())
    }

    fn save(&self, settings: &LabelSettings) -> Result<()> {
        *self
            .settings
            .lock()
            .map_err(|_| WardenError::Settings("settings lock poisoned".to_string()))? =
            settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_default_enabled() {
        let settings = LabelSettings::default();
        assert!(settings.enabled(EntityType::Email));
        assert!(settings.enabled(EntityType::Person));
    }

    #[test]
    fn test_disable_and_reenable() {
        let mut settings = LabelSettings::default();
        settings.set_enabled(EntityType::Phone, false);
        assert!(!settings.enabled(EntityType::Phone));

        settings.set_enabled(EntityType::Phone, true);
        assert!(settings.enabled(EntityType::Phone));
        // Re-enabling clears the override entirely
        assert_eq!(settings, LabelSettings::default());
    }

    #[test]
    fn test_wire_map_covers_every_label() {
        let mut settings = LabelSettings::default();
        settings.set_enabled(EntityType::Nric, false);

        let wire = settings.to_wire_map();
        assert_eq!(wire.len(), EntityType::ALL.len());
        assert_eq!(wire.get("NRIC"), Some(&false));
        assert_eq!(wire.get("EMAIL"), Some(&true));
    }

    #[test]
    fn test_toml_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("settings.toml"));

        let mut settings = LabelSettings::default();
        settings.set_enabled(EntityType::CreditCard, false);
        settings.set_enabled(EntityType::Password, false);
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert!(!loaded.enabled(EntityType::CreditCard));
        assert!(!loaded.enabled(EntityType::Password));
        assert!(loaded.enabled(EntityType::Email));
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("absent.toml"));
        assert_eq!(store.load().unwrap(), LabelSettings::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not [valid").unwrap();
        assert!(TomlSettingsStore::new(&path).load().is_err());
    }
}
