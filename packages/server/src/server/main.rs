// Main entry point for the bot server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_core::domains::conversation::models::SessionStore;
use server_core::kernel::{PgEventStore, PgRumorStore, ServerDeps, TelegramAdapter};
use server_core::server::build_app;
use server_core::Config;
use telegram::{TelegramOptions, TelegramService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting rumor bot server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire up collaborators
    let telegram = Arc::new(
        TelegramService::new(TelegramOptions {
            bot_token: config.bot_token.clone(),
        })
        .context("Failed to build Telegram client")?,
    );

    let deps = Arc::new(ServerDeps::new(
        Arc::new(PgRumorStore::new(pool.clone())),
        Arc::new(PgEventStore::new(pool.clone())),
        Arc::new(TelegramAdapter::new(telegram)),
        Arc::new(SessionStore::new()),
        config.bot_username.clone(),
    ));

    let app = build_app(pool, deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);
    tracing::info!("Webhook endpoint: http://localhost:{}/webhooks/telegram", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
