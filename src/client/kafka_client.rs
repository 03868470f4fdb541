use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::config::{ProducerSettings, Settings};
use crate::producer::Producer;
use crate::transport::{ClusterInfo, KafkaTransport, TopicInfo, Transport};
use crate::utils::{Error, Result};

/// Broker URL schemes accepted in front of `host:port`.
const BROKER_SCHEMES: [&str; 2] = ["kafka://", "plaintext://"];

/// A client connected to a set of brokers.
///
/// The client owns the transport (and with it the broker connections).
/// Producers borrow it, so `close` can only be called once every producer
/// has been dropped.
#[derive(Debug)]
pub struct Client<T: Transport = KafkaTransport> {
    brokers: Vec<String>,
    client_id: String,
    producer_settings: ProducerSettings,
    transport: T,
}

impl Client<KafkaTransport> {
    /// Create a Kafka client for `brokers` using default settings.
    pub fn new<I, S>(brokers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut settings = Settings::default();
        settings.client.brokers = brokers
            .into_iter()
            .map(|b| b.as_ref().to_string())
            .collect();
        Self::from_settings(&settings)
    }

    /// Create a Kafka client from loaded configuration.
    ///
    /// Fails with `Error::NoBrokers` or `Error::InvalidBroker` before any
    /// connection is attempted.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let brokers = parse_brokers(&settings.client.brokers)?;
        let client_id = resolve_client_id(settings.client.client_id.as_deref());
        let transport = KafkaTransport::connect(&brokers, &client_id, &settings.producer)?;

        info!(brokers = %brokers.join(","), client_id = %client_id, "created Kafka client");

        Ok(Self {
            brokers,
            client_id,
            producer_settings: settings.producer.clone(),
            transport,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        brokers: &[String],
        client_id: Option<&str>,
        producer_settings: ProducerSettings,
        transport: T,
    ) -> Result<Self> {
        Ok(Self {
            brokers: parse_brokers(brokers)?,
            client_id: resolve_client_id(client_id),
            producer_settings,
            transport,
        })
    }

    /// Returns the validated broker addresses, normalised to `host:port`.
    pub fn brokers(&self) -> &[String] {
        &self.brokers
    }

    /// Returns the id this client reports to the brokers.
    ///
    /// This is the configured id when one was given, otherwise the sanitized
    /// `USER` name or a generated `kafpub-<uuid>`.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Obtain a new producer handle with an empty buffer.
    pub fn producer(&self) -> Producer<'_, T> {
        Producer::new(&self.transport, &self.producer_settings)
    }

    /// Fetch the cluster metadata, waiting at most the delivery timeout.
    pub fn metadata(&self) -> Result<ClusterInfo> {
        self.transport.metadata(self.timeout())
    }

    /// List the cluster's topics.
    pub fn topics(&self) -> Result<Vec<TopicInfo>> {
        Ok(self.metadata()?.topics)
    }

    /// Flush anything still in flight and release the connection.
    pub fn close(self) -> Result<()> {
        self.transport.flush(self.timeout())?;
        info!(client_id = %self.client_id, "client closed");
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.producer_settings.delivery_timeout_ms)
    }
}

/// Validate a broker list, normalising each entry to `host:port`.
pub fn parse_brokers<S: AsRef<str>>(brokers: &[S]) -> Result<Vec<String>> {
    if brokers.is_empty() {
        return Err(Error::NoBrokers);
    }
    brokers.iter().map(|b| parse_broker(b.as_ref())).collect()
}

/// Validate one broker address. A `kafka://` or `plaintext://` prefix is
/// stripped; the rest must be `host:port` with a port in `1..=65535`.
pub fn parse_broker(addr: &str) -> Result<String> {
    let invalid = || Error::InvalidBroker(addr.to_string());

    let trimmed = addr.trim();
    let bare = BROKER_SCHEMES
        .iter()
        .find_map(|scheme| trimmed.strip_prefix(scheme))
        .unwrap_or(trimmed);

    let (host, port) = bare.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(format!("{host}:{p}")),
        _ => Err(invalid()),
    }
}

/// The configured id, else the sanitized `USER`, else a random id.
pub fn resolve_client_id(configured: Option<&str>) -> String {
    configured
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var("USER")
                .ok()
                .filter(|user| !user.is_empty())
                .map(|user| sanitize_client_id(&user))
        })
        .unwrap_or_else(|| format!("kafpub-{}", Uuid::new_v4()))
}

/// Keep `[A-Za-z0-9._-]`; every other byte becomes `_<decimal byte>`.
pub fn sanitize_client_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push('_');
                out.push_str(&byte.to_string());
            }
        }
    }
    out
}
