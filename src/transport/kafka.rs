//! Kafka transport
//!
//! Wraps an `rdkafka` `FutureProducer`. Connections are opened lazily by
//! librdkafka on the first send, so creating the transport never blocks.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::debug;

use crate::config::ProducerSettings;
use crate::producer::Message;
use crate::transport::{ClusterInfo, Delivery, TopicInfo, Transport};
use crate::utils::{Error, Result};

pub struct KafkaTransport {
    producer: FutureProducer,
    delivery_timeout: Duration,
}

/// Build the librdkafka configuration for a producer.
pub fn kafka_client_config(
    brokers: &[String],
    client_id: &str,
    settings: &ProducerSettings,
) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers.join(","))
        .set("client.id", client_id)
        .set("message.timeout.ms", settings.delivery_timeout_ms.to_string())
        .set("message.send.max.retries", settings.max_retries.to_string())
        .set("retry.backoff.ms", settings.retry_backoff_ms.to_string())
        .set("acks", &settings.required_acks);
    config
}

impl KafkaTransport {
    pub fn connect(
        brokers: &[String],
        client_id: &str,
        settings: &ProducerSettings,
    ) -> Result<Self> {
        let producer: FutureProducer =
            kafka_client_config(brokers, client_id, settings).create()?;
        debug!(brokers = %brokers.join(","), client_id, "created Kafka producer");

        Ok(Self {
            producer,
            delivery_timeout: Duration::from_millis(settings.delivery_timeout_ms),
        })
    }
}

impl Transport for KafkaTransport {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        let record: FutureRecord<'_, (), [u8]> = FutureRecord::to(message.topic())
            .payload(message.payload())
            .timestamp(message.create_time());

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(self.delivery_timeout))
            .await
            .map_err(|(err, _)| Error::Send {
                topic: message.topic().to_string(),
                reason: err.to_string(),
            })?;

        Ok(Delivery {
            topic: message.topic().to_string(),
            partition,
            offset,
        })
    }

    fn flush(&self, timeout: Duration) -> Result<()> {
        Ok(self.producer.flush(Timeout::After(timeout))?)
    }

    fn metadata(&self, timeout: Duration) -> Result<ClusterInfo> {
        let metadata = self.producer.client().fetch_metadata(None, timeout)?;
        let topics = metadata
            .topics()
            .iter()
            .map(|topic| TopicInfo {
                name: topic.name().to_string(),
                partitions: topic.partitions().len(),
                error: topic.error().map(|err| format!("{err:?}")),
            })
            .collect();

        Ok(ClusterInfo {
            brokers: metadata.brokers().len(),
            orig_broker_id: metadata.orig_broker_id(),
            orig_broker_name: metadata.orig_broker_name().to_string(),
            topics,
        })
    }
}

impl std::fmt::Debug for KafkaTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaTransport")
            .field("producer", &"rdkafka::FutureProducer")
            .field("delivery_timeout", &self.delivery_timeout)
            .finish()
    }
}
