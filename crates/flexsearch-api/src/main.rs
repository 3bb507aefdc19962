use std::sync::Arc;

use anyhow::Context;
use flexsearch_store::SearchIndex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flexsearch_api::{cors_layer, create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flexsearch_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    let settings = &config.settings;

    tracing::info!(
        port = config.port,
        elasticsearch_url = %settings.elasticsearch_url.value,
        index = %settings.index_name.value,
        model = %settings.model.value,
        embedder_provider = %settings.embedder_provider.value,
        "Starting Flexsearch API server"
    );

    let state = AppState::from_settings(settings).context("Invalid server configuration")?;

    // The server starts anyway; requests report 503 until the cluster is up
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "Search backend is not reachable yet");
    }

    let cors = cors_layer(&config.cors_origin)
        .with_context(|| format!("Invalid FLEXSEARCH_CORS_ORIGIN '{}'", config.cors_origin))?;
    let app = create_router(Arc::new(state)).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
