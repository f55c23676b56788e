use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "atsky",
    version,
    about = "A lightweight Bluesky terminal client",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write debug logs.
    #[arg(short, long)]
    pub debug: bool,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// PDS host or origin to sign in to.
    #[arg(short, long, value_name = "HOST")]
    pub server: Option<String>,

    /// Skip the splash screen.
    #[arg(long)]
    pub skip_splash: bool,
}
