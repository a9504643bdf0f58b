//! Page through the commerce platform and reconcile every order or booking
//! into the record store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde_json::Value;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use commerce_sync::domain::coercion::coerce_timestamp;
use commerce_sync::domain::ports::{
    BookingRepository, BulkImportCommand, BulkImportRequest, OrderRepository,
};
use commerce_sync::domain::{
    BulkImportService, CommerceEntity, StoreReconciler, TraceId, split_statuses,
};
use commerce_sync::outbound::commerce::{CommerceCredentials, WooCommerceHttpSource};
use commerce_sync::outbound::memory::{InMemoryBookingRepository, InMemoryOrderRepository};
use commerce_sync::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselOrderRepository, PoolConfig, run_pending_migrations,
};
use commerce_sync::settings::SyncSettings;

/// `import-commerce` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-commerce",
    about = "Import orders or bookings from the commerce platform into the record store",
    version
)]
struct CliArgs {
    /// Record kind to import: `orders` or `bookings`.
    #[arg(long, value_name = "kind", value_parser = parse_entity)]
    entity: CommerceEntity,
    /// Records per page, clamped to `1..=100`.
    #[arg(long = "per-page", value_name = "count")]
    per_page: Option<u32>,
    /// Stop after this many pages.
    #[arg(long, value_name = "count", value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,
    /// Only import these statuses; repeat or comma-separate.
    #[arg(long, value_name = "status")]
    status: Vec<String>,
    /// Skip records with no activity at or after this ISO-8601 instant.
    #[arg(long, value_name = "timestamp", value_parser = parse_since)]
    since: Option<DateTime<Utc>>,
}

impl CliArgs {
    fn into_request(self) -> BulkImportRequest {
        BulkImportRequest {
            entity: self.entity,
            per_page: self.per_page,
            max_pages: self.pages,
            statuses: split_statuses(self.status.iter().map(String::as_str)),
            since: self.since,
        }
    }
}

fn parse_entity(raw: &str) -> Result<CommerceEntity, String> {
    raw.parse::<CommerceEntity>().map_err(|err| err.to_string())
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>, String> {
    coerce_timestamp(Some(&Value::String(raw.to_owned())))
        .ok_or_else(|| format!("`{raw}` is not an ISO-8601 timestamp"))
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

type Repositories = (Arc<dyn OrderRepository>, Arc<dyn BookingRepository>);

async fn repositories(settings: &SyncSettings) -> io::Result<Repositories> {
    let Some(url) = settings.database_url() else {
        warn!("no database URL configured; imported records are discarded on exit");
        let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::default());
        let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::default());
        return Ok((orders, bookings));
    };
    let migration_url = url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
    let bookings: Arc<dyn BookingRepository> = Arc::new(DieselBookingRepository::new(pool));
    Ok((orders, bookings))
}

async fn async_main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = SyncSettings::load_from_iter([OsString::from("import-commerce")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let connection = settings
        .commerce_connection()
        .map_err(io::Error::other)?
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "commerce platform not configured: set COMMERCE_SYNC_COMMERCE_BASE_URL, \
                 COMMERCE_SYNC_COMMERCE_CONSUMER_KEY and COMMERCE_SYNC_COMMERCE_CONSUMER_SECRET",
            )
        })?;
    let source = WooCommerceHttpSource::new(
        connection.base_url,
        CommerceCredentials::new(connection.consumer_key, connection.consumer_secret),
        connection.timeout,
    )
    .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?;

    let (orders, bookings) = repositories(&settings).await?;
    let reconciler = Arc::new(StoreReconciler::new(
        orders,
        bookings,
        Arc::new(DefaultClock),
    ));
    let importer = BulkImportService::new(Arc::new(source), reconciler)
        .with_default_per_page(settings.import_per_page());

    let trace_id = TraceId::generate();
    let request = args.into_request();
    info!(%trace_id, entity = %request.entity, "import started");
    let summary = TraceId::scope(trace_id, importer.import(request))
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    let rendered = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("import-commerce").chain(args.iter().copied()))
    }

    #[rstest]
    fn builds_a_filtered_request() {
        let args = parse(&[
            "--entity",
            "bookings",
            "--per-page",
            "25",
            "--status",
            "confirmed,paid",
            "--status",
            "complete",
            "--since",
            "2026-01-01T00:00:00Z",
        ])
        .expect("arguments should parse");

        let request = args.into_request();

        assert_eq!(request.entity, CommerceEntity::Booking);
        assert_eq!(request.per_page, Some(25));
        assert_eq!(request.max_pages, None);
        assert_eq!(request.statuses, vec!["confirmed", "paid", "complete"]);
        assert_eq!(
            request.since,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single()
        );
    }

    #[rstest]
    #[case::unknown_entity(&["--entity", "coupons"])]
    #[case::zero_pages(&["--entity", "orders", "--pages", "0"])]
    #[case::bad_since(&["--entity", "orders", "--since", "yesterday"])]
    fn rejects_invalid_arguments(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
