use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bookstore_lib::{config::Settings, router, store::PgStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing signing secret or database URL fails here, before anything
    // is served.
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let store = PgStore::connect(&settings.database_url).await?;
    store.ensure_schema().await?;

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(store, settings));
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
