use anyhow::Context;
use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;
use server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = database::init_db(&config.database.url, config.database.max_connections)
        .await
        .context("failed to initialize database")?;
    seed::ensure_indexes(&db).await?;
    if config.seed.demo_catalog {
        seed::seed_demo_catalog(&db).await?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
