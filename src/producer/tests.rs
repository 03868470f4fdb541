use super::Producer;
use super::message::Message;
use super::topic::{MAX_TOPIC_LEN, validate};
use crate::config::ProducerSettings;
use crate::transport::MemoryTransport;
use crate::utils::Error;

fn settings_with_capacity(max_buffer_size: usize) -> ProducerSettings {
    ProducerSettings {
        max_buffer_size,
        ..ProducerSettings::default()
    }
}

#[test]
fn test_topic_validation() {
    assert!(validate("one").is_ok());
    assert!(validate("metrics.cpu_load-v2").is_ok());
    assert!(matches!(validate(""), Err(Error::EmptyTopic)));
    assert!(matches!(validate(".."), Err(Error::InvalidTopic { .. })));
    assert!(matches!(
        validate("with space"),
        Err(Error::InvalidTopic { .. })
    ));
    assert!(validate(&"t".repeat(MAX_TOPIC_LEN)).is_ok());
    assert!(matches!(
        validate(&"t".repeat(MAX_TOPIC_LEN + 1)),
        Err(Error::InvalidTopic { .. })
    ));
}

#[test]
fn test_message_new() {
    let msg = Message::new("json", r#"{"a":3}"#).unwrap();
    assert_eq!(msg.topic(), "json");
    assert_eq!(msg.payload(), br#"{"a":3}"#);
    assert_eq!(msg.payload_str(), Some(r#"{"a":3}"#));
    assert_eq!(msg.len(), 7);
    assert!(msg.create_time() > 0);

    let binary = Message::new("bin", vec![0xff, 0x00]).unwrap();
    assert_eq!(binary.payload_str(), None);

    assert!(matches!(Message::new("", "x"), Err(Error::EmptyTopic)));
}

#[test]
fn test_produce_buffers_without_sending() {
    let (transport, mut rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    producer.produce("message 1", "one").unwrap();
    producer.produce("message 2", "two").unwrap();

    assert_eq!(producer.buffer_size(), 2);
    assert_eq!(producer.buffered()[1].topic(), "two");
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_produce_rejects_empty_topic() {
    let (transport, _rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    assert!(matches!(
        producer.produce("payload", ""),
        Err(Error::EmptyTopic)
    ));
    assert!(producer.is_empty());
}

#[test]
fn test_buffer_overflow() {
    let (transport, _rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &settings_with_capacity(2));

    producer.produce("a", "one").unwrap();
    producer.produce("b", "one").unwrap();
    let err = producer.produce("c", "one").unwrap_err();

    assert!(matches!(err, Error::BufferOverflow { capacity: 2 }));
    assert_eq!(producer.buffer_size(), 2);

    producer.clear_buffer();
    assert!(producer.produce("c", "one").is_ok());
}

#[tokio::test]
async fn test_deliver_messages_sends_in_order_and_empties_buffer() {
    let (transport, mut rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    producer.produce("message 1", "one").unwrap();
    producer.produce("message 2", "two").unwrap();
    producer.produce("message 3", "one").unwrap();

    let deliveries = producer.deliver_messages().await.unwrap();

    let summary: Vec<_> = deliveries
        .iter()
        .map(|d| (d.topic.as_str(), d.offset))
        .collect();
    assert_eq!(summary, vec![("one", 0), ("two", 0), ("one", 1)]);
    assert!(producer.is_empty());

    assert_eq!(rx.try_recv().unwrap().payload_str(), Some("message 1"));
    assert_eq!(rx.try_recv().unwrap().payload_str(), Some("message 2"));
    assert_eq!(rx.try_recv().unwrap().payload_str(), Some("message 3"));
}

#[tokio::test]
async fn test_deliver_messages_with_empty_buffer_is_noop() {
    let (transport, _rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    assert!(producer.deliver_messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_messages_stay_buffered() {
    let (transport, mut rx) = MemoryTransport::new();
    let transport = transport.failing_topic("two");
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    producer.produce("message 1", "one").unwrap();
    producer.produce("message 2", "two").unwrap();
    producer.produce("message 3", "three").unwrap();
    producer.produce("message 4", "two").unwrap();

    let err = producer.deliver_messages().await.unwrap_err();
    assert!(matches!(
        err,
        Error::DeliveryFailed {
            failed: 2,
            attempted: 4
        }
    ));

    let left: Vec<_> = producer
        .buffered()
        .iter()
        .map(|m| m.payload_str().unwrap())
        .collect();
    assert_eq!(left, vec!["message 2", "message 4"]);

    assert_eq!(rx.try_recv().unwrap().topic(), "one");
    assert_eq!(rx.try_recv().unwrap().topic(), "three");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_produce_all_delivers_in_batches_beyond_capacity() {
    let (transport, mut rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &settings_with_capacity(2));

    let payloads = ["m1", "m2", "m3", "m4", "m5"];
    let mut batches = Vec::new();
    let delivered = producer
        .produce_all("one", payloads, |batch| {
            batches.push(batch.iter().map(|d| d.offset).collect::<Vec<_>>())
        })
        .await
        .unwrap();

    assert_eq!(delivered, 5);
    assert_eq!(batches, vec![vec![0, 1], vec![2, 3], vec![4]]);
    assert!(producer.is_empty());
    for expected in payloads {
        assert_eq!(rx.try_recv().unwrap().payload_str(), Some(expected));
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_produce_all_stops_on_delivery_failure() {
    let (transport, mut rx) = MemoryTransport::new();
    let transport = transport.failing_topic("broken");
    let mut producer = Producer::new(&transport, &settings_with_capacity(2));

    let mut calls = 0;
    let err = producer
        .produce_all("broken", ["a", "b", "c"], |_| calls += 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DeliveryFailed {
            failed: 2,
            attempted: 2
        }
    ));
    assert_eq!(calls, 0);
    assert_eq!(producer.buffer_size(), 2);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_is_full_tracks_capacity() {
    let (transport, _rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &settings_with_capacity(1));

    assert!(!producer.is_full());
    producer.produce("a", "one").unwrap();
    assert!(producer.is_full());
}

#[tokio::test]
async fn test_shutdown_discards_buffer_and_closes() {
    let (transport, mut rx) = MemoryTransport::new();
    let mut producer = Producer::new(&transport, &ProducerSettings::default());

    producer.produce("never sent", "one").unwrap();
    producer.shutdown().unwrap();

    assert!(producer.is_closed());
    assert!(producer.is_empty());
    assert!(rx.try_recv().is_err());

    assert!(matches!(producer.produce("late", "one"), Err(Error::Closed)));
    assert!(matches!(
        producer.deliver_messages().await,
        Err(Error::Closed)
    ));
    // second shutdown is harmless
    assert!(producer.shutdown().is_ok());
}
