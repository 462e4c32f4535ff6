//! Channel bridge between synthesized records and Kafka.
//!
//! This crate provides the two symmetric operations of the pipeline's
//! transport layer:
//!
//! - [`publish`] - encode a batch of records as JSON and deliver it to a
//!   topic, retrying the whole batch with fixed back-off on transport
//!   failure (at-least-once; retries can duplicate)
//! - [`consume`] - subscribe from the earliest retained offset, collect a
//!   bounded number of records, and commit exactly what was returned
//!
//! Both operations run the same bounded retry state machine
//! ([`retry`]) and report the attempt count as first-class return
//! information on success and failure alike.
//!
//! The broker itself sits behind the [`transport`] traits: one session per
//! attempt, released on every exit path. [`kafka::KafkaConnector`] is the
//! real implementation; [`testing::MemoryChannel`] backs the bridge with an
//! in-memory log and scriptable failures so the retry contract is testable
//! without a broker.

pub mod config;
pub mod consume;
pub mod error;
pub mod kafka;
pub mod publish;
pub mod retry;
pub mod testing;
pub mod transport;
pub mod wire;

// Re-exports for convenience
pub use config::BridgeConfig;
pub use consume::{consume, ConsumeReport};
pub use error::{BridgeError, TransportError};
pub use kafka::KafkaConnector;
pub use publish::{publish, PublishReport};
pub use retry::RetryPolicy;
pub use transport::{ChannelConnector, ConsumerSession, ProducerSession};
