//! Run the grading HTTP server

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use markwise_server::{MarkwiseServer, ServerConfig};
use tracing::info;

use crate::config::ConfigLoader;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Model id to grade with (overrides config)
    #[arg(long)]
    pub model: Option<String>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(model) = args.model {
        config.model.model = model;
    }

    let state = super::app_state(&config)?;
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_sweep_interval(Duration::from_secs(config.grading.sweep_interval_secs));

    info!(
        model = %config.model.model,
        base_url = %config.model.base_url,
        "Starting markwise server on {}",
        server_config.addr()
    );

    MarkwiseServer::new(server_config, state).run().await?;
    Ok(())
}
