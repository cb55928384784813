use anyhow::Result;
use forecast_server::{create_router, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forecast_server=info,sales_forecast=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        listen_addr = %config.listen_addr,
        model = ?config.model,
        train_boundary = %config.train_boundary,
        max_upload_bytes = config.max_upload_bytes,
        "Starting forecast server"
    );

    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(?addr, "Forecast server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
