//! The `transport` module is the seam between a `Producer` and the broker.
//!
//! `KafkaTransport` hands records to `rdkafka`, which owns the wire protocol
//! and the broker connections. `MemoryTransport` keeps everything in-process
//! and is what the tests run against.

pub mod kafka;
pub mod memory;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::producer::Message;
use crate::utils::Result;

pub use kafka::KafkaTransport;
pub use memory::MemoryTransport;

/// Acknowledgement of one delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

/// A topic as reported by cluster metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInfo {
    pub name: String,
    pub partitions: usize,
    /// Broker-side error reported for this topic, if any.
    pub error: Option<String>,
}

/// Cluster metadata as returned by the broker that answered the request.
///
/// `orig_broker_id` and `orig_broker_name` identify that broker; `brokers`
/// is the number of brokers it knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub brokers: usize,
    pub orig_broker_id: i32,
    pub orig_broker_name: String,
    pub topics: Vec<TopicInfo>,
}

pub trait Transport {
    /// Send one message and resolve once the broker has acknowledged it.
    fn send(&self, message: &Message) -> impl Future<Output = Result<Delivery>>;

    /// Block until every in-flight message is delivered or `timeout` passes.
    fn flush(&self, timeout: Duration) -> Result<()>;

    /// Fetch the cluster's metadata: brokers and every known topic.
    fn metadata(&self, timeout: Duration) -> Result<ClusterInfo>;
}
