//! Bridge configuration.

use clap::Parser;
use std::time::Duration;

/// Configuration for publish and consume operations.
///
/// Every knob is an explicit parameter with a documented default; there is
/// no process-global broker configuration.
#[derive(Debug, Clone, Parser)]
pub struct BridgeConfig {
    /// Topic to publish to or consume from
    #[clap(long)]
    pub topic: String,

    /// Broker endpoints as host:port (comma-separated or repeated --brokers)
    #[clap(long, value_delimiter = ',', default_value = "localhost:9092")]
    pub brokers: Vec<String>,

    /// Consumer group ID, so offset tracking persists across restarts
    #[clap(long, default_value = "avro-stream-consumer")]
    pub group_id: String,

    /// Total attempts per operation, including the first
    #[clap(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Fixed back-off between attempts, in milliseconds
    #[clap(long, default_value_t = 1000)]
    pub backoff_ms: u64,

    /// How long a consume poll waits before treating the channel as idle,
    /// in milliseconds
    #[clap(long, default_value_t = 5000)]
    pub poll_timeout_ms: u64,

    /// Kafka consumer session timeout, in milliseconds
    #[clap(long, default_value = "6000")]
    pub session_timeout_ms: String,

    /// Delivery timeout for each published record, in milliseconds
    #[clap(long, default_value_t = 5000)]
    pub message_timeout_ms: u64,
}

impl BridgeConfig {
    /// Config for the given topic with the documented defaults.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            brokers: vec!["localhost:9092".to_string()],
            group_id: "avro-stream-consumer".to_string(),
            max_attempts: 3,
            backoff_ms: 1000,
            poll_timeout_ms: 5000,
            session_timeout_ms: "6000".to_string(),
            message_timeout_ms: 5000,
        }
    }

    /// Fixed back-off between attempts.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Idle timeout for one consume poll.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Delivery timeout for one published record.
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::for_topic("events");

        assert_eq!(config.topic, "events");
        assert_eq!(config.brokers, vec!["localhost:9092".to_string()]);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff(), Duration::from_millis(1000));
    }
}
