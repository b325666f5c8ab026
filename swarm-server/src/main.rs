use swarm_server::{AppState, build_router, logger, workers};

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use swarm_pipeline::{InMemoryQueueBus, InMemoryRegistry, Trigger};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = swarm_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = swarm_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting swarm-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Install Prometheus recorder; the handle backs the /metrics endpoint
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Wire the pipeline: queues, registry, consumers
    let bus = InMemoryQueueBus::new();
    let registry = InMemoryRegistry::new(config.registry.page_size);

    workers::start(&bus, &registry, &config).await;

    let trigger = Arc::new(Trigger::new(
        Arc::new(bus.clone()),
        &config.broadcast,
        &config.queue,
    ));

    // Build application state
    let app_state = AppState {
        trigger,
        registry,
        partition_count: config.broadcast.partition_count,
        next_partition: Arc::new(AtomicU32::new(0)),
    };

    // Build router
    let app = build_router(app_state, metrics_handle);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {actual_addr}");

    // Start server with graceful shutdown on Ctrl+C
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
                Err(e) => error!("Failed to listen for SIGINT: {e}"),
            }
        })
        .await?;

    Ok(())
}
