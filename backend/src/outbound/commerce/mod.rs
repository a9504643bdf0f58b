//! Commerce platform outbound adapters.
//!
//! A thin HTTP implementation of the `CommerceSource` port for WooCommerce
//! stores (core orders plus the Bookings extension).

mod http_source;

pub use http_source::{CommerceCredentials, WooCommerceHttpSource};
