use std::{error::Error, path::PathBuf};

mod pivot;
mod server;

use clap::Parser;
use init_tracing_opentelemetry::tracing_subscriber_ext::init_subscribers;
use tracing::{info, warn};

use server::{config::Config, AppState};

#[derive(Parser)]
struct ServerOptions {
    #[arg(long, env, default_value_t = 8080)]
    port: u16,
    /// JSON file describing the table layout, the built in medals layout is used when absent
    #[arg(long, env = "PIVOT_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides the aggregation service url of the configuration
    #[arg(long, env)]
    aggregation_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _tracing = init_subscribers()?;

    let options = ServerOptions::parse();

    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(aggregation_url) = options.aggregation_url {
        config.aggregation_url = aggregation_url;
    }

    info!(
        aggregation_url = %config.aggregation_url,
        dataset_url = %config.dataset_url,
        "loaded table layout"
    );

    let router = server::router(AppState::new(config));

    let address = format!("0.0.0.0:{}", options.port).parse()?;

    info!(%address, "starting server");

    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "unable to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
