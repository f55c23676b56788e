//! Infrastructure layer with external service adapters.

/// AT Protocol HTTP clients.
pub mod atproto;
/// Application configuration.
pub mod config;
/// DNS resolution.
pub mod dns;

pub use atproto::{WellKnownClient, XrpcClient};
pub use config::{AppConfig, CliArgs, ConfigError, ConfigStore, LogLevel};
pub use dns::HickoryDnsResolver;
