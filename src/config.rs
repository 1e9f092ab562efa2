use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::feed::DEFAULT_AUTO_ADVANCE;

pub const ENV_API_URL: &str = "SABIO_API_URL";
pub const ENV_ANON_KEY: &str = "SABIO_ANON_KEY";

pub const DEFAULT_DRAG_UNITS_PER_ROW: i32 = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base url of the hosted auth/database service
    pub api_url: Option<String>,
    pub anon_key: Option<String>,
    pub auto_advance_ms: u64,
    /// Drag distance units per terminal row
    pub drag_units_per_row: i32,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            anon_key: None,
            auto_advance_ms: DEFAULT_AUTO_ADVANCE.as_millis() as u64,
            drag_units_per_row: DEFAULT_DRAG_UNITS_PER_ROW,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Apply `SABIO_*` overrides from the given lookup; empty values are ignored
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(key) = non_empty(ENV_ANON_KEY) {
            self.anon_key = Some(key);
        }
        self
    }

    pub fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    /// Both url and key are needed to talk to the backend
    pub fn backend(&self) -> Option<(&str, &str)> {
        match (self.api_url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = ProjectDirs::from("", "", AppDirs::APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("sabio_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));

        let cfg = store.load();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.auto_advance(), Duration::from_secs(1));
        assert_eq!(cfg.drag_units_per_row, 16);
        assert!(cfg.backend().is_none());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            api_url: Some("https://demo.supabase.co".into()),
            anon_key: Some("anon".into()),
            auto_advance_ms: 250,
            drag_units_per_row: 8,
            log_level: "debug".into(),
        };

        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
        assert_eq!(cfg.backend(), Some(("https://demo.supabase.co", "anon")));
    }

    #[test]
    fn corrupt_or_partial_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(&path, br#"{"auto_advance_ms": 1500}"#).unwrap();
        let cfg = store.load();
        assert_eq!(cfg.auto_advance_ms, 1500);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn env_overrides_file_values() {
        let cfg = Config {
            api_url: Some("https://old.example".into()),
            ..Config::default()
        }
        .with_env(|key| match key {
            ENV_API_URL => Some("https://new.example".into()),
            ENV_ANON_KEY => Some("  ".into()),
            _ => None,
        });

        assert_eq!(cfg.api_url.as_deref(), Some("https://new.example"));
        assert_eq!(cfg.anon_key, None);
    }
}
