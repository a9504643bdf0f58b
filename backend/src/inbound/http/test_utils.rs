//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{CommerceSource, FixtureCommerceSource, RecordReconciler};
use crate::domain::test_fixtures::fixture_clock;
use crate::domain::{
    BulkImportService, ResyncService, StoreReconciler, WebhookAuthenticator, WebhookSecret,
    WebhookSyncService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBookingRepository, InMemoryOrderRepository};

/// Shared secret the in-memory harness verifies against.
pub const TEST_SECRET: &str = "wc-secret";

/// Fully wired state over in-memory stores, plus handles on those stores.
pub struct InMemoryHarness {
    pub state: HttpState,
    pub orders: Arc<InMemoryOrderRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
}

/// Wire the real domain services over in-memory stores and `source`.
pub fn in_memory_harness(source: Arc<dyn CommerceSource>) -> InMemoryHarness {
    let orders = Arc::new(InMemoryOrderRepository::default());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let reconciler: Arc<dyn RecordReconciler> = Arc::new(StoreReconciler::new(
        orders.clone(),
        bookings.clone(),
        fixture_clock(),
    ));
    let state = HttpState {
        webhooks: Arc::new(WebhookSyncService::new(
            authenticator(),
            Arc::clone(&reconciler),
        )),
        imports: Arc::new(BulkImportService::new(
            Arc::clone(&source),
            Arc::clone(&reconciler),
        )),
        resync: Arc::new(ResyncService::new(source, Arc::clone(&reconciler))),
        orders: orders.clone(),
        bookings: bookings.clone(),
    };
    InMemoryHarness {
        state,
        orders,
        bookings,
    }
}

/// Harness for a platform with no records.
pub fn empty_harness() -> InMemoryHarness {
    in_memory_harness(Arc::new(FixtureCommerceSource))
}

/// Authenticator configured with [`TEST_SECRET`].
pub fn authenticator() -> WebhookAuthenticator {
    WebhookAuthenticator::new(WebhookSecret::new(TEST_SECRET))
}

/// Signature header value for `body` under [`TEST_SECRET`].
pub fn sign(body: &[u8]) -> String {
    authenticator().sign(body).unwrap_or_default()
}
