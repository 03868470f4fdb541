//! # kafpub
//!
//! `kafpub` is a small message-publishing client for Kafka. A `Client` holds
//! the broker list and the connection; a `Producer` obtained from it buffers
//! messages and delivers them all at once:
//!
//! ```no_run
//! # async fn run() -> kafpub::Result<()> {
//! let client = kafpub::Client::new(["localhost:29092"])?;
//! let mut producer = client.producer();
//! producer.produce("message 1", "one")?;
//! producer.deliver_messages().await?;
//! producer.shutdown()?;
//! drop(producer);
//! client.close()
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - `client`: broker list validation, client id and producer construction.
//! - `config`: loading settings from file and environment.
//! - `producer`: messages, topic validation and the buffering producer.
//! - `seed`: the reference four-message publishing sequence.
//! - `transport`: the broker seam, backed by `rdkafka` or kept in memory.
//! - `utils`: the shared error type and logging setup.

pub mod client;
pub mod config;
pub mod producer;
pub mod seed;
pub mod transport;
pub mod utils;

pub use client::Client;
pub use producer::{Message, Producer};
pub use utils::{Error, Result};
