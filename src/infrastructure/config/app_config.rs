//! Application configuration.

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use super::args::CliArgs;
use crate::domain::entities::{Account, DEFAULT_SERVER, Jwt};

const APP_NAME: &str = "atsky";
const APP_QUALIFIER: &str = "social";
const APP_ORGANIZATION: &str = "atsky";

/// File name of the config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "ATSKY_";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Persisted account and logging settings.
///
/// Only the refresh token is written to disk; access tokens and passwords
/// never are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Start at the login page.
    #[serde(skip)]
    pub skip_splash: bool,

    /// Last login identifier.
    #[serde(default)]
    pub identifier: String,

    /// Account DID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,

    /// Stored refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_jwt: Option<String>,

    /// PDS host or origin.
    #[serde(default = "default_server")]
    pub server: String,

    /// Write debug logs to the log file.
    #[serde(default)]
    pub debug: bool,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Merges CLI arguments into configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(server) = args.server {
            self.server = server;
        }
        if args.debug {
            self.debug = true;
        }
        if args.skip_splash {
            self.skip_splash = true;
        }
    }

    /// Applies `ATSKY_*` overrides from `vars`.
    pub fn apply_env_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "IDENTIFIER" => self.identifier = value,
                "DID" => self.did = Some(value).filter(|did| !did.is_empty()),
                "REFRESH_JWT" => self.refresh_jwt = Some(value).filter(|jwt| !jwt.is_empty()),
                "SERVER" if !value.is_empty() => self.server = value,
                "DEBUG" => {
                    if let Some(flag) = parse_flag(&value) {
                        self.debug = flag;
                    }
                }
                "LOG_LEVEL" => {
                    if let Ok(level) = LogLevel::from_str(&value, true) {
                        self.log_level = level;
                    }
                }
                _ => debug!(key, "Ignoring unknown environment override"),
            }
        }
    }

    /// Returns the level logs are written at.
    #[must_use]
    pub const fn effective_log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }

    /// Returns whether logs go to a file at all.
    #[must_use]
    pub const fn logging_enabled(&self) -> bool {
        self.debug || self.log_path.is_some()
    }

    /// Returns the persisted account.
    #[must_use]
    pub fn account(&self) -> Account {
        Account {
            identifier: self.identifier.clone(),
            server: self.server.clone(),
            did: self.did.clone(),
            refresh_jwt: self.refresh_jwt.clone().map(Jwt::new),
        }
    }

    /// Replaces the account fields.
    pub fn set_account(&mut self, account: &Account) {
        self.identifier.clone_from(&account.identifier);
        self.server.clone_from(&account.server);
        self.did.clone_from(&account.did);
        self.refresh_jwt = account
            .refresh_jwt
            .as_ref()
            .map(|jwt| jwt.as_str().to_string());
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("atsky.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            skip_splash: false,
            identifier: String::new(),
            did: None,
            refresh_jwt: None,
            server: default_server(),
            debug: false,
            log_level: LogLevel::Info,
        }
    }
}
