use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use query_console::{ConsoleConfig, ConsoleError};

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "query_console=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::parse();
    tracing::info!(bind = %config.bind, "query console starting");

    query_console::app::serve(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
