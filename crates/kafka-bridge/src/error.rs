//! Error types for the channel bridge.

use thiserror::Error;

use crate::wire::WireError;

/// A transport-level failure within one attempt.
///
/// These are the recoverable faults the retry loop is allowed to spend its
/// attempt budget on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Receive failed: {0}")]
    Receive(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Timed out waiting for the channel")]
    Timeout,
}

/// Errors surfaced by publish and consume operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport failure that survived every retry attempt. Carries the
    /// last underlying cause and the total attempt count.
    #[error("Channel error after {attempts_made} attempts: {cause}")]
    Channel {
        cause: TransportError,
        attempts_made: u32,
    },

    /// Caller-initiated abort. Always surfaced, never retried.
    #[error("Operation cancelled")]
    Cancelled,

    /// Record payload could not be encoded or decoded. Not retried:
    /// re-reading bad data cannot fix it.
    #[error("Codec error: {0}")]
    Codec(#[from] WireError),
}
