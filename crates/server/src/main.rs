use std::time::Duration;

use anyhow::{Context, Result};
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_server::{app, bootstrap_with_config, serve};
use tokio::sync::oneshot;

fn init_logging(config: &AppConfig) {
    use storefront_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging comes up before anything else can emit events.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let application = bootstrap_with_config(config).await?;
    let address = application.config.server_address();
    let grace = Duration::from_secs(application.config.server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("could not bind {address}"))?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "storefront-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let router = app(&application);
    let mut server = tokio::spawn(serve(listener, router, async move {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        finished = &mut server => {
            finished.context("server task panicked")??;
        }
        signal = wait_for_shutdown() => {
            signal?;
            tracing::info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "storefront-server draining connections"
            );
            let _ = stop_tx.send(());
            match tokio::time::timeout(grace, &mut server).await {
                Ok(finished) => finished.context("server task panicked")??,
                Err(_) => {
                    tracing::warn!(
                        event_name = "system.server.drain_timeout",
                        correlation_id = "shutdown",
                        "graceful shutdown window elapsed; aborting open connections"
                    );
                    server.abort();
                }
            }
        }
    }

    application.db_pool.close().await;
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "storefront-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
