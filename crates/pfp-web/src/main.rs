mod error;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use pfp_core::client::PfpClient;
use pfp_core::config::PfpConfig;
use pfp_core::sources::SourceRegistry;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub client: PfpClient,
    pub registry: SourceRegistry,
    pub config: PfpConfig,
}

impl AppState {
    pub fn from_config(config: PfpConfig) -> Result<Self> {
        let client = PfpClient::from_config(&config.api).context("building PFP API client")?;
        let registry = SourceRegistry::with_extra(&config.sources.extra);
        Ok(Self {
            client,
            registry,
            config,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pfp_web=info,tower_http=info")),
        )
        .init();

    let cwd = std::env::current_dir().ok();
    let config = PfpConfig::load(cwd.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("falling back to default config: {e}");
        PfpConfig::default_config()
    });

    let state = Arc::new(AppState::from_config(config.clone())?);

    let app = routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.web.host, config.web.port);
    tracing::info!(api = %config.api.search_url, "pfp-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
