use casework_editor::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "casework.config.json";

/// Casework configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON file holding every section row, relative to the config
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Sync engine tuning
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_store_path() -> String {
    ".casework/sections.json".to_string()
}

impl Config {
    /// Load config from a directory, falling back to defaults
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("{}: {}", config_path.display(), e))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path of the section store
    pub fn store_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            engine: EngineConfig::default(),
        }
    }
}
