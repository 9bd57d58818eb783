pub mod catalog;
pub mod client;
pub mod config;
pub mod middleware;
pub mod recommend;
pub mod server;
pub mod web;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Recommender error: {0}")]
    Recommender(#[from] recommend::RecommenderRepoError),
    #[error("Page error: {0}")]
    Page(#[from] web::PageError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the defaults.
pub fn init_logging(format: LogFormat, debug_logs: bool) {
    let default_filter = if debug_logs {
        "movierec_rs=debug,tower_http=debug"
    } else {
        "movierec_rs=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

pub async fn run(mut config: config::Config, config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    info!("Site name: {}", config.site_name);
    if debug_logs {
        info!("Debug logging enabled");
    }

    info!(
        movies = %config.dataset.movies,
        credits = %config.dataset.credits,
        "Loading dataset"
    );
    let recommender = Arc::new(recommend::RecommenderRepo::load(&config).await?);
    info!(movies = recommender.current().movie_count(), "Recommender ready");

    if let Some(interval) = config.dataset.reload_interval {
        if recommender.clone().start_background_reload(interval) {
            info!("Reloading dataset every {}s", interval);
        }
    }

    let pages = web::PageRenderer::new(config.site_name.clone())?;

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, recommender, pages);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
