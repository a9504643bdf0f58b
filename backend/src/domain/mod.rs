//! Commerce sync domain.
//!
//! Purpose: turn heterogeneous platform records into canonical orders and
//! bookings and reconcile them idempotently into the store. Nothing here
//! knows about HTTP, SQL or the platform's wire protocol; those live behind
//! the traits in [`ports`].
//!
//! Public surface:
//! - Canonical records ([`CanonicalOrder`], [`CanonicalBooking`]) and the
//!   [`CommerceEntity`] discriminator.
//! - Pure helpers: [`normalizer`], [`webhook_auth`], [`delete_intent`].
//! - Services implementing the driving ports: [`WebhookSyncService`],
//!   [`BulkImportService`], [`ResyncService`], plus the store-backed
//!   [`StoreReconciler`].
//! - [`Error`]/[`ErrorCode`] for transport-agnostic failures.

pub mod bulk_import;
pub mod coercion;
pub mod delete_intent;
pub mod error;
pub mod normalizer;
pub mod ports;
pub mod reconciler;
pub mod records;
pub mod resync;
pub mod trace_id;
pub mod webhook_auth;
pub mod webhook_sync;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::bulk_import::{BulkImportService, ImportFilters, clamp_per_page, split_statuses};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::normalizer::MappingError;
pub use self::reconciler::StoreReconciler;
pub use self::records::{
    CanonicalBooking, CanonicalOrder, CanonicalRecord, CommerceEntity, PLATFORM_SOURCE,
    StoredBooking, StoredOrder, UnknownEntity, UpsertReceipt,
};
pub use self::resync::ResyncService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::webhook_auth::{
    Verification, VerificationFailure, WebhookAuthenticator, WebhookSecret,
};
pub use self::webhook_sync::WebhookSyncService;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
