use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_path")]
    pub data_path: String,

    #[serde(default = "default_export_path")]
    pub export_path: String,

    #[serde(default = "default_gantt_limit")]
    pub gantt_limit: usize,
}

fn default_data_path() -> String {
    "reviews_traceability.csv".to_string()
}

fn default_export_path() -> String {
    "filtered_traceability.csv".to_string()
}

fn default_gantt_limit() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            export_path: default_export_path(),
            gantt_limit: default_gantt_limit(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("balloon-board")
            .join("config.toml")
    }
}
