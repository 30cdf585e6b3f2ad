#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod demo;

use args::Args;
use clap::Parser;
use crafter_config::Config;
use crafter_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    if let Some(visibility) = args.visibility {
        config.response.visibility = Some(visibility);
    }

    // Initialize telemetry
    let telemetry_guard = crafter_telemetry::init(config.telemetry.as_ref(), &args.log)?;

    tracing::info!(
        config_path = %args.config.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
        "starting crafter"
    );

    // Build server
    let server = Server::builder(config)
        .routes(demo::routes())
        .hub(demo::chat_hub())
        .build();

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    if let Err(e) = telemetry_guard.force_flush() {
        tracing::warn!(error = %e, "failed to flush telemetry on shutdown");
    }

    tracing::info!("crafter stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
