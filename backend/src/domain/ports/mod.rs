//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_repository;
mod bulk_import_command;
mod commerce_source;
mod order_repository;
mod record_reconciler;
mod resync_command;
mod store_error;
mod webhook_sync_command;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, FixtureBookingRepository};
#[cfg(test)]
pub use bulk_import_command::MockBulkImportCommand;
pub use bulk_import_command::{
    BulkImportCommand, BulkImportError, BulkImportRequest, FixtureBulkImportCommand,
    ImportFailure, ImportSummary,
};
#[cfg(test)]
pub use commerce_source::MockCommerceSource;
pub use commerce_source::{CommerceSource, CommerceSourceError, FixtureCommerceSource};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository};
#[cfg(test)]
pub use record_reconciler::MockRecordReconciler;
pub use record_reconciler::RecordReconciler;
#[cfg(test)]
pub use resync_command::MockResyncCommand;
pub use resync_command::{FixtureResyncCommand, ResyncCommand, ResyncError, ResyncOutcome};
pub use store_error::StoreError;
#[cfg(test)]
pub use webhook_sync_command::MockWebhookSyncCommand;
pub use webhook_sync_command::{
    FixtureWebhookSyncCommand, SyncAction, WebhookDelivery, WebhookSyncCommand,
    WebhookSyncError, WebhookSyncOutcome,
};
