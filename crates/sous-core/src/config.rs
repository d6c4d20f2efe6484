use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// StorageBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One YAML file per session under `.sous/sessions/`.
    #[default]
    File,
    /// All sessions in a single redb database file.
    Redb,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_kitchen")]
    pub kitchen: String,
    #[serde(default)]
    pub storage: StorageBackend,
    /// Timer-completion chime on or off.
    #[serde(default = "default_sound")]
    pub sound: bool,
}

fn default_kitchen() -> String {
    "kitchen".to_string()
}

fn default_sound() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kitchen: default_kitchen(),
            storage: StorageBackend::default(),
            sound: default_sound(),
        }
    }
}

impl Config {
    pub fn new(kitchen: impl Into<String>) -> Self {
        Self {
            kitchen: kitchen.into(),
            ..Self::default()
        }
    }

    /// Load config, falling back to defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
