//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only ever see domain
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingRepository, BulkImportCommand, FixtureBookingRepository, FixtureBulkImportCommand,
    FixtureOrderRepository, FixtureResyncCommand, FixtureWebhookSyncCommand, OrderRepository,
    ResyncCommand, WebhookSyncCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub webhooks: Arc<dyn WebhookSyncCommand>,
    pub imports: Arc<dyn BulkImportCommand>,
    pub resync: Arc<dyn ResyncCommand>,
    pub orders: Arc<dyn OrderRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Default for HttpState {
    /// Fixture-backed state that accepts requests without touching a store.
    fn default() -> Self {
        Self {
            webhooks: Arc::new(FixtureWebhookSyncCommand),
            imports: Arc::new(FixtureBulkImportCommand),
            resync: Arc::new(FixtureResyncCommand),
            orders: Arc::new(FixtureOrderRepository),
            bookings: Arc::new(FixtureBookingRepository),
        }
    }
}
