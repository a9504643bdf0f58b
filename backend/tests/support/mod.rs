//! Shared wiring for the HTTP flow tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::Value;

use commerce_sync::domain::ports::{CommerceSource, CommerceSourceError, RecordReconciler};
use commerce_sync::domain::{
    BulkImportService, CommerceEntity, ResyncService, StoreReconciler, WebhookAuthenticator,
    WebhookSecret, WebhookSyncService,
};
use commerce_sync::inbound::http::state::HttpState;
use commerce_sync::outbound::memory::{InMemoryBookingRepository, InMemoryOrderRepository};

pub const SECRET: &str = "flow-secret";

/// Platform double serving pre-built pages and recording every page request.
#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<(CommerceEntity, u32), Vec<Value>>,
    records: HashMap<(CommerceEntity, i64), Value>,
    requested: Mutex<Vec<(CommerceEntity, u32, u32)>>,
}

impl ScriptedSource {
    pub fn with_page(mut self, entity: CommerceEntity, page: u32, records: Vec<Value>) -> Self {
        self.pages.insert((entity, page), records);
        self
    }

    pub fn with_record(mut self, entity: CommerceEntity, id: i64, record: Value) -> Self {
        self.records.insert((entity, id), record);
        self
    }

    /// `(entity, page, per_page)` for every page fetched so far.
    pub fn requested(&self) -> Vec<(CommerceEntity, u32, u32)> {
        self.requested
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommerceSource for ScriptedSource {
    async fn fetch_page(
        &self,
        entity: CommerceEntity,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, CommerceSourceError> {
        if let Ok(mut calls) = self.requested.lock() {
            calls.push((entity, page, per_page));
        }
        Ok(self.pages.get(&(entity, page)).cloned().unwrap_or_default())
    }

    async fn fetch_record(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<Option<Value>, CommerceSourceError> {
        Ok(self.records.get(&(entity, external_id)).cloned())
    }
}

pub struct Flow {
    pub state: HttpState,
    pub orders: Arc<InMemoryOrderRepository>,
    pub bookings: Arc<InMemoryBookingRepository>,
}

pub fn authenticator() -> WebhookAuthenticator {
    WebhookAuthenticator::new(WebhookSecret::new(SECRET))
}

pub fn sign(body: &[u8]) -> String {
    authenticator().sign(body).unwrap_or_default()
}

/// Real services over in-memory stores and `source`.
pub fn flow(source: Arc<ScriptedSource>) -> Flow {
    let orders = Arc::new(InMemoryOrderRepository::default());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let reconciler: Arc<dyn RecordReconciler> = Arc::new(StoreReconciler::new(
        orders.clone(),
        bookings.clone(),
        Arc::new(DefaultClock),
    ));
    let source: Arc<dyn CommerceSource> = source;
    Flow {
        state: HttpState {
            webhooks: Arc::new(WebhookSyncService::new(
                authenticator(),
                Arc::clone(&reconciler),
            )),
            imports: Arc::new(BulkImportService::new(
                Arc::clone(&source),
                Arc::clone(&reconciler),
            )),
            resync: Arc::new(ResyncService::new(source, reconciler)),
            orders: orders.clone(),
            bookings: bookings.clone(),
        },
        orders,
        bookings,
    }
}
