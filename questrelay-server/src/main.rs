use anyhow::{Context, Result};
use clap::Parser;
use questrelay_server::{CacheStore, ServerConfig, app, create_router};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "questrelay-server")]
#[command(about = "Caching relay for the Discord quests API", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "QUESTRELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => ServerConfig::default(),
    };
    config.apply_env();

    init_tracing(&config);

    info!("Starting Quest Relay v{}", env!("CARGO_PKG_VERSION"));

    if !config.has_token() {
        warn!("DISCORD_TOKEN is not set, quest requests will fail until it is configured");
    }

    let (store, state) = app::build_default(&config).context("Failed to build application")?;

    // Schema provisioning has to succeed before anything is served
    if let Err(e) = store.provision().await {
        error!("Failed to provision cache store: {}", e);
        std::process::exit(1);
    }
    info!("Cache store is ready");

    if config.cache.warm_on_startup && config.has_token() {
        info!("Fetching initial quest data...");
        match state.fetcher.get_quests().await {
            Ok(quests) => info!("Initial quest data loaded ({} quest(s))", quests.len()),
            Err(e) => warn!("Failed to fetch initial quests: {}", e),
        }
    }

    let app = create_router(state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("API available at http://{}/v1/quests", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "questrelay_server={level},tower_http={level}",
            level = config.logging.level
        ))
    });

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully..."),
        _ = terminate => info!("Received terminate signal, shutting down gracefully..."),
    }
}
