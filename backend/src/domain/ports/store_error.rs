//! Failure type shared by the canonical record repositories.

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading or writing canonical records.
    pub enum StoreError {
        /// The store could not be reached or a connection could not be checked out.
        Connection { message: String } =>
            "record store connection failed: {message}",
        /// The store rejected a query or mutation.
        Query { message: String } =>
            "record store query failed: {message}",
    }
}
