//! Producer engine
//!
//! A `Producer` buffers messages locally and only touches the network when
//! `deliver_messages` is called:
//! - `produce` validates the topic and appends to the buffer, bounded by
//!   `max_buffer_size`
//! - `deliver_messages` sends the buffer in order, one message at a time,
//!   then flushes the transport; messages that fail stay buffered so a later
//!   call can retry them
//! - `shutdown` closes the handle; anything still buffered is discarded and
//!   later calls fail with `Error::Closed`
//!
//! A producer borrows its client's transport, so the client cannot be closed
//! while a producer is alive.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ProducerSettings;
use crate::producer::Message;
use crate::transport::{Delivery, Transport};
use crate::utils::{Error, Result};

/// A buffering handle for publishing messages through a transport.
///
/// Obtained from `Client::producer`. Messages are held in memory until
/// `deliver_messages` sends them.
#[derive(Debug)]
pub struct Producer<'a, T: Transport> {
    transport: &'a T,
    buffer: Vec<Message>,
    max_buffer_size: usize,
    delivery_timeout: Duration,
    closed: bool,
}

impl<'a, T: Transport> Producer<'a, T> {
    /// Creates an open producer with an empty buffer.
    ///
    /// The buffer limit and delivery timeout come from `settings`.
    pub fn new(transport: &'a T, settings: &ProducerSettings) -> Self {
        Self {
            transport,
            buffer: Vec::new(),
            max_buffer_size: settings.max_buffer_size,
            delivery_timeout: Duration::from_millis(settings.delivery_timeout_ms),
            closed: false,
        }
    }

    /// Enqueue `payload` for `topic`. Nothing is sent until `deliver_messages`.
    pub fn produce(&mut self, payload: impl Into<Vec<u8>>, topic: &str) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }

        let message = Message::new(topic, payload)?;

        if self.is_full() {
            warn!(
                topic,
                capacity = self.max_buffer_size,
                "producer buffer full, message rejected"
            );
            return Err(Error::BufferOverflow {
                capacity: self.max_buffer_size,
            });
        }

        debug!(topic, bytes = message.len(), "buffered message");
        self.buffer.push(message);
        Ok(())
    }

    /// Enqueue every payload for `topic`, delivering whenever the buffer is
    /// full.
    ///
    /// Each acknowledged batch is handed to `on_delivered` as soon as it is
    /// delivered. The last partial batch is delivered before returning, so on
    /// success the buffer is empty. Returns the number of delivered messages.
    ///
    /// A delivery failure stops the loop with `Error::DeliveryFailed`; the
    /// failed messages stay buffered and later payloads are not enqueued.
    pub async fn produce_all<I, F>(
        &mut self,
        topic: &str,
        payloads: I,
        mut on_delivered: F,
    ) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
        F: FnMut(&[Delivery]),
    {
        let mut delivered = 0;

        for payload in payloads {
            if self.is_full() {
                let batch = self.deliver_messages().await?;
                delivered += batch.len();
                on_delivered(&batch);
            }
            self.produce(payload, topic)?;
        }

        let batch = self.deliver_messages().await?;
        if !batch.is_empty() {
            delivered += batch.len();
            on_delivered(&batch);
        }

        Ok(delivered)
    }

    /// Number of messages waiting to be delivered.
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the buffer has reached `max_buffer_size`, so the next
    /// `produce` would fail with `Error::BufferOverflow`.
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.max_buffer_size
    }

    /// Read-only view of the buffered messages, in enqueue order.
    pub fn buffered(&self) -> &[Message] {
        &self.buffer
    }

    /// Drop every buffered message without sending it.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Send every buffered message and wait for the broker to acknowledge.
    ///
    /// Returns the deliveries in send order. If any message fails, the failed
    /// messages remain buffered (in their original order) and
    /// `Error::DeliveryFailed` is returned.
    pub async fn deliver_messages(&mut self) -> Result<Vec<Delivery>> {
        if self.closed {
            return Err(Error::Closed);
        }
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }

        let pending = std::mem::take(&mut self.buffer);
        let attempted = pending.len();
        let mut deliveries = Vec::with_capacity(attempted);

        for message in pending {
            match self.transport.send(&message).await {
                Ok(delivery) => {
                    debug!(
                        topic = %delivery.topic,
                        partition = delivery.partition,
                        offset = delivery.offset,
                        "delivered message"
                    );
                    deliveries.push(delivery);
                }
                Err(e) => {
                    warn!(topic = message.topic(), error = %e, "delivery failed");
                    self.buffer.push(message);
                }
            }
        }

        self.transport.flush(self.delivery_timeout)?;

        if self.buffer.is_empty() {
            info!(count = attempted, "delivered buffered messages");
            Ok(deliveries)
        } else {
            Err(Error::DeliveryFailed {
                failed: self.buffer.len(),
                attempted,
            })
        }
    }

    /// Returns true once `shutdown` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the producer. Buffered messages are not delivered. Calling it
    /// again is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if !self.buffer.is_empty() {
            warn!(
                discarded = self.buffer.len(),
                "shutting down with undelivered messages"
            );
            self.buffer.clear();
        }

        self.transport.flush(self.delivery_timeout)?;
        info!("producer shut down");
        Ok(())
    }
}
