//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use commerce_sync::domain::WebhookSecret;
use commerce_sync::domain::bulk_import::DEFAULT_PER_PAGE;
use commerce_sync::domain::ports::CommerceSource;
use commerce_sync::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) webhook_secret: Option<WebhookSecret>,
    pub(crate) commerce_source: Option<Arc<dyn CommerceSource>>,
    pub(crate) import_per_page: u32,
}

impl ServerConfig {
    /// Configuration with in-memory stores, no webhook secret and no
    /// commerce platform connection.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            webhook_secret: None,
            commerce_source: None,
            import_per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Persist records through PostgreSQL instead of in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_webhook_secret(mut self, secret: Option<WebhookSecret>) -> Self {
        self.webhook_secret = secret;
        self
    }

    /// Source used by bulk imports and resyncs.
    #[must_use]
    pub fn with_commerce_source(mut self, source: Arc<dyn CommerceSource>) -> Self {
        self.commerce_source = Some(source);
        self
    }

    #[must_use]
    pub fn with_import_per_page(mut self, per_page: u32) -> Self {
        self.import_per_page = per_page;
        self
    }
}
