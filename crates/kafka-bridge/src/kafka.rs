//! Kafka implementation of the channel transport.
//!
//! One rdkafka client per session: producers are `FutureProducer`s that
//! acknowledge each delivery, consumers are `StreamConsumer`s with manual
//! offset commits and `auto.offset.reset=earliest`. Dropping a session
//! tears the underlying client down, so the retry loop never leaks a
//! connection.

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::{Offset, TopicPartitionList};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use crate::config::BridgeConfig;
use crate::error::TransportError;
use crate::transport::{ChannelConnector, ConsumerSession, ProducerSession};

/// Connector backed by a Kafka cluster.
pub struct KafkaConnector {
    brokers: String,
    session_timeout_ms: String,
    message_timeout: Duration,
}

impl KafkaConnector {
    /// Create a connector from the bridge configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            brokers: config.brokers.join(","),
            session_timeout_ms: config.session_timeout_ms.clone(),
            message_timeout: config.message_timeout(),
        }
    }

    /// Create a topic if it doesn't exist.
    pub async fn create_topic(&self, topic: &str, partitions: i32) -> Result<(), TransportError> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()?;

        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(TransportError::Kafka)?;

        for result in results {
            match result {
                Ok(topic_name) => {
                    info!("Topic '{topic_name}' created successfully");
                }
                Err((topic_name, err)) => {
                    let err_str = err.to_string();
                    if err_str.contains("already exists") {
                        info!("Topic '{topic_name}' already exists");
                    } else {
                        return Err(TransportError::Connect(format!(
                            "Failed to create topic {topic_name}: {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ChannelConnector for KafkaConnector {
    async fn producer(&self, topic: &str) -> Result<Box<dyn ProducerSession>, TransportError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            )
            .create()?;

        Ok(Box::new(KafkaProducerSession {
            producer,
            topic: topic.to_string(),
            message_timeout: self.message_timeout,
        }))
    }

    async fn consumer(
        &self,
        topic: &str,
        group_id: &str,
    ) -> Result<Box<dyn ConsumerSession>, TransportError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", &self.session_timeout_ms)
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[topic])?;

        Ok(Box::new(KafkaConsumerSession {
            consumer,
            topic: topic.to_string(),
            delivered_offsets: HashMap::new(),
        }))
    }
}

/// Producer session over one `FutureProducer`.
struct KafkaProducerSession {
    producer: FutureProducer,
    topic: String,
    message_timeout: Duration,
}

#[async_trait]
impl ProducerSession for KafkaProducerSession {
    async fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        let record = FutureRecord::<(), _>::to(&self.topic).payload(payload);

        self.producer
            .send(record, self.message_timeout)
            .await
            .map_err(|(err, _)| TransportError::Kafka(err))?;

        Ok(())
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        // send() already awaited each delivery; this drains anything still
        // buffered inside librdkafka.
        self.producer.flush(self.message_timeout)?;
        Ok(())
    }
}

/// Consumer session over one `StreamConsumer`, tracking the highest
/// delivered offset per partition for the final commit.
struct KafkaConsumerSession {
    consumer: StreamConsumer,
    topic: String,
    delivered_offsets: HashMap<i32, i64>,
}

#[async_trait]
impl ConsumerSession for KafkaConsumerSession {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Ok(Ok(message)) => {
                let payload = message
                    .payload()
                    .ok_or_else(|| TransportError::Receive("message has no payload".to_string()))?
                    .to_vec();

                let highest = self
                    .delivered_offsets
                    .entry(message.partition())
                    .or_insert(-1);
                *highest = (*highest).max(message.offset());

                Ok(Some(payload))
            }
            Ok(Err(err)) => Err(TransportError::Kafka(err)),
            Err(_) => Ok(None),
        }
    }

    async fn commit(&mut self) -> Result<(), TransportError> {
        if self.delivered_offsets.is_empty() {
            return Ok(());
        }

        let mut tpl = TopicPartitionList::new();
        for (&partition, &offset) in &self.delivered_offsets {
            tpl.add_partition_offset(&self.topic, partition, Offset::Offset(offset + 1))
                .map_err(|e| TransportError::Commit(format!("Failed to add offset: {e}")))?;
        }

        self.consumer
            .commit(&tpl, CommitMode::Sync)
            .map_err(|e| TransportError::Commit(format!("Failed to commit offsets: {e}")))?;

        Ok(())
    }
}
