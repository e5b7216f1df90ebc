//! Rendimiento Web Server
//!
//! Run with: cargo run -p rendimiento-web

use rendimiento_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rendimiento=debug,info")),
        )
        .init();

    info!("Starting Rendimiento Web Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Prediction endpoint: {}", config.endpoint.url);

    let state = rendimiento_web::state::AppState::new(&config)?;
    let app = rendimiento_web::router::build_router(state, &config.server.static_dir);

    let addr = config.server.addr()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
