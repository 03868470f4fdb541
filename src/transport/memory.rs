//! In-memory transport
//!
//! Delivered messages are pushed onto a tokio unbounded channel, the way the
//! broker hands messages to its connected clients. Every topic has a single
//! partition whose offsets start at 0. Topics can be marked as failing to
//! exercise delivery errors without a broker.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::producer::Message;
use crate::transport::{ClusterInfo, Delivery, TopicInfo, Transport};
use crate::utils::{Error, Result};

/// Broker name reported in the metadata of a `MemoryTransport`.
pub const MEMORY_BROKER_NAME: &str = "memory/0";

#[derive(Debug)]
pub struct MemoryTransport {
    sender: UnboundedSender<Message>,
    failing_topics: HashSet<String>,
    next_offsets: Mutex<BTreeMap<String, i64>>,
}

impl MemoryTransport {
    /// Create a transport and the receiving side of its delivery channel.
    pub fn new() -> (Self, UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let transport = Self {
            sender,
            failing_topics: HashSet::new(),
            next_offsets: Mutex::new(BTreeMap::new()),
        };
        (transport, receiver)
    }

    fn offsets(&self) -> MutexGuard<'_, BTreeMap<String, i64>> {
        self.next_offsets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every send to `topic` fail.
    pub fn failing_topic(mut self, topic: &str) -> Self {
        self.failing_topics.insert(topic.to_string());
        self
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, message: &Message) -> Result<Delivery> {
        let send_error = |reason: &str| Error::Send {
            topic: message.topic().to_string(),
            reason: reason.to_string(),
        };

        if self.failing_topics.contains(message.topic()) {
            return Err(send_error("topic rejected by transport"));
        }

        let mut offsets = self.offsets();

        self.sender
            .send(message.clone())
            .map_err(|_| send_error("receiver closed"))?;

        let next = offsets.entry(message.topic().to_string()).or_insert(0);
        let offset = *next;
        *next += 1;

        Ok(Delivery {
            topic: message.topic().to_string(),
            partition: 0,
            offset,
        })
    }

    fn flush(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    fn metadata(&self, _timeout: Duration) -> Result<ClusterInfo> {
        let topics = self
            .offsets()
            .keys()
            .map(|name| TopicInfo {
                name: name.clone(),
                partitions: 1,
                error: None,
            })
            .collect();

        Ok(ClusterInfo {
            brokers: 1,
            orig_broker_id: 0,
            orig_broker_name: MEMORY_BROKER_NAME.to_string(),
            topics,
        })
    }
}
