use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use atsky::application::IdentityResolver;
use atsky::infrastructure::{
    AppConfig, CliArgs, ConfigStore, HickoryDnsResolver, WellKnownClient, XrpcClient,
};
use atsky::presentation::App;
use atsky::presentation::ui::PageContext;

fn init_logging(config: &AppConfig) -> Result<()> {
    if !config.logging_enabled() {
        return Ok(());
    }
    let Some(log_path) = config.effective_log_path() else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_log_level().to_string()));

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    info!(path = %log_path.display(), "Logging initialized");
    Ok(())
}

fn create_app() -> Result<App> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    let store = Arc::new(ConfigStore::new(args.config.as_deref())?);
    let mut config = store.load()?;
    config.merge_with_args(args);

    init_logging(&config)?;

    info!(
        version = atsky::VERSION,
        server = %config.server,
        config = %store.path().display(),
        "Starting atsky"
    );

    let xrpc = Arc::new(XrpcClient::new()?);
    let resolver = IdentityResolver::new(
        Arc::new(HickoryDnsResolver::new()),
        Arc::new(WellKnownClient::new()?),
    );

    let ctx = PageContext::new(
        resolver,
        xrpc.clone(),
        xrpc,
        store,
        config.account(),
    );

    Ok(App::new(ctx, config.skip_splash))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
