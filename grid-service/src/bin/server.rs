//! Grid ledger server binary

use grid_service::{spawn_grid, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Microgrid Ledger Server");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(owner = %config.owner, rate = config.credits_per_unit, "configuration loaded");

    // Spawn the single-writer actor
    let (handle, mut events) = spawn_grid(config);

    // Ship ledger events to the sink as JSON lines
    let sink = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => tracing::info!(target: "grid_events", "{}", line),
                Err(e) => tracing::error!("failed to serialize event: {}", e),
            }
        }
    });

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down grid ledger server");
    handle.shutdown().await?;
    sink.await?;
    Ok(())
}
