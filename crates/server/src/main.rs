use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mirrortube_core::{
    load_config, load_mirror_list, validate_config, Capability, FailoverFetcher,
    HttpMirrorClient, IdentityProvider, MirrorRegistry, RandomUserAgent, VideoCatalog,
};

use mirrortube_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MIRRORTUBE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!(
        "Configuration loaded (strict media check: {})",
        config.fetch.strict_media_check
    );

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(RandomUserAgent::from_config(&config.identity));

    // The mirror list is fetched once; the service cannot run without it.
    let mirror_list = load_mirror_list(&config.mirrors, identity.as_ref())
        .await
        .with_context(|| format!("Failed to load mirror list from {}", config.mirrors.source_url))?;
    for capability in Capability::ALL {
        info!(
            "{} mirrors: {}",
            capability,
            mirror_list.mirrors(capability).len()
        );
    }
    let registry = Arc::new(MirrorRegistry::new(mirror_list));

    let client = HttpMirrorClient::new(&config.fetch).context("Failed to create HTTP client")?;
    let fetcher = Arc::new(FailoverFetcher::new(
        config.fetch.clone(),
        registry,
        Arc::new(client),
        identity,
    ));
    let catalog = VideoCatalog::new(fetcher);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(catalog));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
