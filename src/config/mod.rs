use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    session::DEFAULT_PEOPLE_COUNT,
    share::DEFAULT_SHARE_TITLE,
    utils::{ensure_dir, write_atomic, PathResolver},
};
use crate::errors::SplitError;

/// User preferences for the CLI front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Headcount used when nothing has been stored yet.
    #[serde(default = "Config::default_people_count_value")]
    pub default_people_count: u32,
    #[serde(default = "Config::default_share_title_value")]
    pub share_title: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_people_count: Self::default_people_count_value(),
            share_title: Self::default_share_title_value(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
        }
    }
}

impl Config {
    pub fn default_people_count_value() -> u32 {
        DEFAULT_PEOPLE_COUNT
    }

    pub fn default_share_title_value() -> String {
        DEFAULT_SHARE_TITLE.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }
}

/// Loads and saves [`Config`] as JSON under `<data dir>/config/config.json`.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, SplitError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self::in_base_dir(&base))
    }

    /// Points at `<base>/config/config.json` without touching the filesystem.
    pub fn in_base_dir(base: &Path) -> Self {
        Self {
            path: PathResolver::config_file_in(base),
        }
    }

    /// Missing file yields defaults; an unparsable file is a configuration error.
    pub fn load(&self) -> Result<Config, SplitError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            SplitError::Config(format!("{} is invalid: {}", self.path.display(), err))
        })
    }

    /// Like [`ConfigManager::load`], but logs problems and falls back to defaults.
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "using default configuration");
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), SplitError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        assert_eq!(manager.load().expect("load"), Config::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let config = Config {
            default_people_count: 2,
            share_title: "Dinner split".into(),
            ui_color_enabled: false,
            plain_output: true,
        };
        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), r#"{ "plain_output": true }"#).expect("write");

        let config = manager.load().expect("load");
        assert!(config.plain_output);
        assert_eq!(config.default_people_count, DEFAULT_PEOPLE_COUNT);
        assert_eq!(config.share_title, DEFAULT_SHARE_TITLE);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), "not json").expect("write");

        assert!(matches!(manager.load(), Err(SplitError::Config(_))));
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn manager_without_directory_loads_defaults_and_fails_to_save() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").expect("write");

        assert!(ConfigManager::with_base_dir(blocker.clone()).is_err());
        let manager = ConfigManager::in_base_dir(&blocker);
        assert_eq!(manager.load_or_default(), Config::default());
        assert!(manager.save(&Config::default()).is_err());
    }
}
