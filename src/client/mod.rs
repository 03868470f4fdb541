//! The `client` module defines the entry point of the library.
//!
//! A `Client` validates the broker list, settles on a client id and owns the
//! transport. Producers are obtained from it with `Client::producer`.

pub mod kafka_client;
pub use kafka_client::{
    Client, parse_broker, parse_brokers, resolve_client_id, sanitize_client_id,
};
