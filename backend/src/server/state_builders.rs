//! Wiring of domain services and adapters into [`HttpState`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::Value;

use commerce_sync::domain::ports::{
    BookingRepository, CommerceSource, CommerceSourceError, OrderRepository, RecordReconciler,
};
use commerce_sync::domain::{
    BulkImportService, CommerceEntity, ResyncService, StoreReconciler, WebhookAuthenticator,
    WebhookSyncService,
};
use commerce_sync::inbound::http::state::HttpState;
use commerce_sync::outbound::memory::{InMemoryBookingRepository, InMemoryOrderRepository};
use commerce_sync::outbound::persistence::{DieselBookingRepository, DieselOrderRepository};

use super::ServerConfig;

const UNCONFIGURED_MESSAGE: &str = "commerce platform connection is not configured";

/// Source used when no platform credentials are configured; every call fails.
struct UnconfiguredCommerceSource;

#[async_trait]
impl CommerceSource for UnconfiguredCommerceSource {
    async fn fetch_page(
        &self,
        _entity: CommerceEntity,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>, CommerceSourceError> {
        Err(CommerceSourceError::transport(UNCONFIGURED_MESSAGE))
    }

    async fn fetch_record(
        &self,
        _entity: CommerceEntity,
        _external_id: i64,
    ) -> Result<Option<Value>, CommerceSourceError> {
        Err(CommerceSourceError::transport(UNCONFIGURED_MESSAGE))
    }
}

type Repositories = (Arc<dyn OrderRepository>, Arc<dyn BookingRepository>);

fn build_repositories(config: &ServerConfig) -> Repositories {
    if let Some(pool) = &config.db_pool {
        let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
        let bookings: Arc<dyn BookingRepository> =
            Arc::new(DieselBookingRepository::new(pool.clone()));
        return (orders, bookings);
    }
    let orders: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::default());
    let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::default());
    (orders, bookings)
}

/// Build the handler state from the server configuration.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let (orders, bookings) = build_repositories(config);
    let reconciler: Arc<dyn RecordReconciler> = Arc::new(StoreReconciler::new(
        Arc::clone(&orders),
        Arc::clone(&bookings),
        Arc::new(DefaultClock),
    ));
    let source: Arc<dyn CommerceSource> = match &config.commerce_source {
        Some(source) => Arc::clone(source),
        None => Arc::new(UnconfiguredCommerceSource),
    };

    HttpState {
        webhooks: Arc::new(WebhookSyncService::new(
            WebhookAuthenticator::new(config.webhook_secret.clone()),
            Arc::clone(&reconciler),
        )),
        imports: Arc::new(
            BulkImportService::new(Arc::clone(&source), Arc::clone(&reconciler))
                .with_default_per_page(config.import_per_page),
        ),
        resync: Arc::new(ResyncService::new(source, reconciler)),
        orders,
        bookings,
    }
}
