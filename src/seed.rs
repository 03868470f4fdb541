//! The reference publishing sequence: one producer, four messages, one
//! delivery, shutdown.

use tracing::info;

use crate::client::Client;
use crate::transport::{Delivery, Transport};
use crate::utils::Result;

/// `(topic, payload)` pairs published by `publish_seed`.
pub const SEED_MESSAGES: [(&str, &str); 4] = [
    ("one", "message 1"),
    ("two", "message 2"),
    ("three", "message 3"),
    ("json", r#"{"a":3, "b":"c", "d":["a"], "e":{"a":"b"}}"#),
];

pub async fn publish_seed<T: Transport>(client: &Client<T>) -> Result<Vec<Delivery>> {
    let mut producer = client.producer();

    for (topic, payload) in SEED_MESSAGES {
        producer.produce(payload, topic)?;
    }

    let deliveries = producer.deliver_messages().await?;
    producer.shutdown()?;

    info!(count = deliveries.len(), "seed messages delivered");
    Ok(deliveries)
}
