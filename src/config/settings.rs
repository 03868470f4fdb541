use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the client connection, the producer and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub client: ClientSettings,
    pub producer: ProducerSettings,
    pub log: LogSettings,
}

/// Configuration settings for the client.
///
/// Defines the bootstrap brokers and the id the client reports to them.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientSettings {
    pub brokers: Vec<String>,
    pub client_id: Option<String>,
}

/// Configuration settings for the producer.
///
/// Controls buffering and the delivery parameters handed to the transport.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProducerSettings {
    pub delivery_timeout_ms: u64,
    pub max_buffer_size: usize,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub required_acks: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub client: Option<PartialClientSettings>,
    pub producer: Option<PartialProducerSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub brokers: Option<Vec<String>>,
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialProducerSettings {
    pub delivery_timeout_ms: Option<u64>,
    pub max_buffer_size: Option<usize>,
    pub max_retries: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub required_acks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:29092".to_string()],
            client_id: None,
        }
    }
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            delivery_timeout_ms: 10_000,
            max_buffer_size: 1000,
            max_retries: 2,
            retry_backoff_ms: 1000,
            required_acks: "all".to_string(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provides default values for `Settings`.
///
/// A client built from these talks to a single local broker on port 29092.
impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            producer: ProducerSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl PartialSettings {
    /// Fill every missing value from `Settings::default()`.
    pub fn merge_with_defaults(self) -> Settings {
        let default = Settings::default();
        let client = self.client;
        let producer = self.producer;

        Settings {
            client: ClientSettings {
                brokers: client
                    .as_ref()
                    .and_then(|c| c.brokers.clone())
                    .unwrap_or(default.client.brokers),
                client_id: client
                    .as_ref()
                    .and_then(|c| c.client_id.clone())
                    .or(default.client.client_id),
            },
            producer: ProducerSettings {
                delivery_timeout_ms: producer
                    .as_ref()
                    .and_then(|p| p.delivery_timeout_ms)
                    .unwrap_or(default.producer.delivery_timeout_ms),
                max_buffer_size: producer
                    .as_ref()
                    .and_then(|p| p.max_buffer_size)
                    .unwrap_or(default.producer.max_buffer_size),
                max_retries: producer
                    .as_ref()
                    .and_then(|p| p.max_retries)
                    .unwrap_or(default.producer.max_retries),
                retry_backoff_ms: producer
                    .as_ref()
                    .and_then(|p| p.retry_backoff_ms)
                    .unwrap_or(default.producer.retry_backoff_ms),
                required_acks: producer
                    .as_ref()
                    .and_then(|p| p.required_acks.clone())
                    .unwrap_or(default.producer.required_acks),
            },
            log: LogSettings {
                level: self
                    .log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
        }
    }
}
