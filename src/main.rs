//! Bookish Server - Book collection REST API

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookish_server::{
    api,
    config::{AppConfig, StorageBackend},
    repository::{memory::MemoryStore, Repository},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookish_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bookish Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");
            Repository::postgres(pool)
        }
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            if config.database.seed {
                let user = store.insert_user("Test User", "test@example.com")?;
                tracing::info!(user_id = user.id, "Seeded in-memory user {}", user.email);
            }
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Repository::memory(store)
        }
    };

    let seed = config.database.seed;
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository);

    if seed {
        state.services.books.seed_defaults().await?;
    }

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
