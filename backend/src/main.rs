//! Service entry-point: loads configuration, prepares the store and serves
//! the webhook, admin and read endpoints.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use commerce_sync::inbound::http::health::HealthState;
use commerce_sync::outbound::commerce::{CommerceCredentials, WooCommerceHttpSource};
use commerce_sync::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use commerce_sync::settings::SyncSettings;
use server::{ServerConfig, create_server};

async fn connect_store(database_url: &str, max_size: u32) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(std::io::Error::other)
}

async fn build_config(settings: &SyncSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr)
        .with_webhook_secret(settings.webhook_secret())
        .with_import_per_page(settings.import_per_page());

    if settings.webhook_secret().is_none() {
        warn!("webhook secret not configured; every webhook will be rejected");
    }

    match settings.database_url() {
        Some(url) => {
            let pool = connect_store(url, settings.pool_max_size()).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; records are kept in memory"),
    }

    match settings
        .commerce_connection()
        .map_err(std::io::Error::other)?
    {
        Some(connection) => {
            let source = WooCommerceHttpSource::new(
                connection.base_url,
                CommerceCredentials::new(connection.consumer_key, connection.consumer_secret),
                connection.timeout,
            )
            .map_err(std::io::Error::other)?;
            config = config.with_commerce_source(Arc::new(source));
        }
        None => warn!("commerce platform not configured; imports and resyncs will fail"),
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SyncSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let config = build_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = ?settings.bind_addr().ok(), "commerce sync listening");
    server.await
}
