use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::IurSettings;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "balochmark";
const APP_NAME: &str = "iur";
const SETTINGS_FILE_NAME: &str = "settings.toml";
const LOG_FILE_NAME: &str = "iur-debug.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Default location of the failure log.
    #[must_use]
    pub fn default_log_path(&self) -> PathBuf {
        self.config_dir.join(LOG_FILE_NAME)
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!("Creating configuration directory at {:?}", self.config_dir);
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the settings record. On first run the file is created with the
    /// documented defaults (the activation record); an unparsable file falls
    /// back to defaults with a warning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_settings(&self, path_override: Option<&Path>) -> Result<IurSettings, ConfigError> {
        self.ensure_config_dir()?;
        let settings_path = path_override.map_or_else(
            || self.config_dir.join(SETTINGS_FILE_NAME),
            std::path::Path::to_path_buf,
        );

        if !settings_path.exists() {
            info!(
                "Settings file not found at {:?}, creating defaults.",
                settings_path
            );
            let defaults = IurSettings::default();
            if let Some(parent) = settings_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&settings_path, &defaults)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&settings_path)?;
        match toml::from_str::<IurSettings>(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Failed to parse settings file: {}. Using defaults.", e);
                Ok(IurSettings::default())
            }
        }
    }

    /// Saves the settings record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_settings(&self, settings: &IurSettings) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let settings_path = self.config_dir.join(SETTINGS_FILE_NAME);
        Self::save_to_file(&settings_path, settings)
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_run_writes_activation_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let settings = manager.load_settings(None).unwrap();
        assert_eq!(settings, IurSettings::default());

        // The defaults were persisted, not just returned.
        let written = fs::read_to_string(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert!(written.contains("upload_method"));
        assert!(written.contains("iur_uploads"));
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "not [valid toml").unwrap();

        let settings = manager.load_settings(None).unwrap();
        assert_eq!(settings, IurSettings::default());
    }

    #[test]
    fn test_round_trip_preserves_credentials() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let mut settings = IurSettings::default();
        settings.imgbb.api_key = "secret".to_owned();
        settings.group_limit = 25;
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings(None).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_path_override_wins() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("unused"));
        let override_path = dir.path().join("elsewhere.toml");
        fs::write(&override_path, "group_limit = 3\n").unwrap();

        let settings = manager.load_settings(Some(&override_path)).unwrap();
        assert_eq!(settings.group_limit, 3);
    }
}
