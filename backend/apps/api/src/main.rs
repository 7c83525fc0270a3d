//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;
mod middleware;

#[cfg(test)]
mod tests;

use auth::{LogMailer, PgUserRepository};
use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tours::PgDocumentStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppParts, build_router, cors_layer};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,tours=info,query=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    if config.token_secret.is_none() {
        tracing::warn!("TOKEN_SECRET not set, using a random secret for this process");
    }
    kernel::error::conversions::set_detailed_errors(config.env.is_development());

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let app = build_router(AppParts {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        mailer: Arc::new(LogMailer),
        documents: Arc::new(PgDocumentStore::new(pool)),
        limiter: Arc::new(MemoryRateLimitStore::new()),
        auth_config: Arc::new(config.auth_config()),
        rate_limit: Arc::new(RateLimitConfig::default()),
    })
    .layer(cors_layer(&config.frontend_origins));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(env = ?config.env, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
