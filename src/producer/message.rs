use chrono::Utc;

use crate::producer::topic;
use crate::utils::Result;

/// A message waiting in a producer buffer.
///
/// The payload is an opaque byte string; no key, partition or headers are
/// attached. `create_time` is the Unix timestamp in milliseconds taken when
/// the message was enqueued and is forwarded to the broker as the record
/// timestamp.
///
/// # Example
///
/// ```rust
/// use kafpub::producer::Message;
///
/// let msg = Message::new("sensor_updates", "{\"temp\":25}").unwrap();
/// assert_eq!(msg.topic(), "sensor_updates");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    topic: String,
    payload: Vec<u8>,
    create_time: i64,
}

impl Message {
    /// Build a message for `topic`, rejecting invalid topic names.
    pub fn new(topic: &str, payload: impl Into<Vec<u8>>) -> Result<Self> {
        topic::validate(topic)?;
        Ok(Self {
            topic: topic.to_string(),
            payload: payload.into(),
            create_time: Utc::now().timestamp_millis(),
        })
    }

    /// Destination topic name. Always a valid, non-empty Kafka topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The raw payload bytes, exactly as given to `new`.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as text, when it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Milliseconds since the Unix epoch at which the message was created.
    pub fn create_time(&self) -> i64 {
        self.create_time
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
