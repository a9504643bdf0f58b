//! Commerce sync service library.
//!
//! Mirrors orders and bookings from a commerce platform into a relational
//! store, from signed push webhooks and from paginated bulk imports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
