use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KablanError, Result};
use crate::store::{open_store, PersistenceMode, Store};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub mode: PersistenceMode,
    #[serde(default = "default_vat_rate")]
    pub default_vat_rate: f64,
}

fn default_vat_rate() -> f64 {
    0.17
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            mode: PersistenceMode::default(),
            default_vat_rate: default_vat_rate(),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("KABLAN_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kablan")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("kablan")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| KablanError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

/// Loads settings and opens the store they point at. Commands call this once
/// at startup and pass the store down; nothing below the command layer reads
/// settings or the mode flag.
pub fn open_configured_store() -> Result<(Settings, Box<dyn Store>)> {
    let settings = load_settings();
    let store = open_store(settings.mode, Path::new(&settings.data_dir))?;
    Ok((settings, store))
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            mode: PersistenceMode::Demo,
            default_vat_rate: 0.18,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.mode, PersistenceMode::Demo);
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.default_vat_rate, 0.18);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let s = Settings::default();
        assert_eq!(s.mode, PersistenceMode::Database);
        assert_eq!(s.default_vat_rate, 0.17);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.mode, PersistenceMode::Database);
        assert_eq!(s.default_vat_rate, 0.17);
    }

    #[test]
    fn test_mode_round_trips_as_snake_case() {
        let json = r#"{"data_dir": "/tmp/test", "mode": "demo"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.mode, PersistenceMode::Demo);
        let out = serde_json::to_string(&s).unwrap();
        assert!(out.contains("\"demo\""));
    }
}
