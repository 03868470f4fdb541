//! The `error` module defines the error type shared by every `kafpub` module.
//!
//! All fallible operations return [`Result`], so callers can propagate with `?`
//! and the binary only has to report a single error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("topic name must not be empty")]
    EmptyTopic,

    #[error("invalid topic name '{topic}': {reason}")]
    InvalidTopic { topic: String, reason: String },

    #[error("no broker addresses configured")]
    NoBrokers,

    #[error("invalid broker address '{0}': expected host:port")]
    InvalidBroker(String),

    #[error("producer buffer is full ({capacity} messages)")]
    BufferOverflow { capacity: usize },

    #[error("failed to deliver {failed} of {attempted} messages")]
    DeliveryFailed { failed: usize, attempted: usize },

    #[error("failed to send message to topic '{topic}': {reason}")]
    Send { topic: String, reason: String },

    #[error("producer has been shut down")]
    Closed,

    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
