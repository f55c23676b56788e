use super::app_config::AppConfig;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::{Account, Jwt};
use crate::domain::errors::AuthError;
use crate::domain::ports::SessionStorePort;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error(
        "config file {} is readable by other users (mode {mode:o}), run chmod 600 on it",
        path.display()
    )]
    PermissionsTooOpen { path: PathBuf, mode: u32 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl From<ConfigError> for AuthError {
    fn from(e: ConfigError) -> Self {
        Self::storage(e.to_string())
    }
}

/// Owns the config file holding the account and its refresh token.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store at `path_override` or the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_path().ok_or(ConfigError::ConfigDirNotFound)?,
        };
        Ok(Self { path })
    }

    /// Creates a store for a specific file (useful for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the config file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is too permissive or unreadable.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.read_file()?;
        config.apply_env_overrides(std::env::vars());
        config.config = Some(self.path.clone());
        Ok(config)
    }

    /// Loads the file as stored, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is too permissive or unreadable.
    pub fn read_file(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            debug!(path = ?self.path, "Config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        self.check_permissions()?;

        let content = fs::read_to_string(&self.path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Writes `config` atomically with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;

        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.exists() {
            info!("Creating configuration directory at {:?}", parent);
            create_private_dir(parent)?;
        }

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        restrict_to_owner(temp_file.as_file())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = ?self.path, "Config saved");
        Ok(())
    }

    #[cfg(unix)]
    fn check_permissions(&self) -> Result<(), ConfigError> {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(&self.path)?.permissions().mode();
        if mode & 0o044 != 0 {
            return Err(ConfigError::PermissionsTooOpen {
                path: self.path.clone(),
                mode: mode & 0o777,
            });
        }
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn check_permissions(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn restrict_to_owner(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_to_owner(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl SessionStorePort for ConfigStore {
    async fn load_account(&self) -> Result<Account, AuthError> {
        Ok(self.read_file()?.account())
    }

    async fn save_account(&self, account: &Account) -> Result<(), AuthError> {
        let mut config = self.read_file()?;
        config.set_account(account);
        self.save(&config)?;
        Ok(())
    }

    // Env overrides never reach the file.
    async fn store_refresh_token(&self, refresh: &Jwt) -> Result<(), AuthError> {
        let mut config = self.read_file()?;
        config.refresh_jwt = Some(refresh.as_str().to_string());
        self.save(&config)?;
        Ok(())
    }
}
