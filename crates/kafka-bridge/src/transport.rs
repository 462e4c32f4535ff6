//! Connector and session traits over the message channel.
//!
//! A connector opens one session per attempt. Sessions own their connection
//! resources and release them on drop, which is what keeps the retry loop
//! leak-free on every exit path, including cancellation mid-attempt.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::TransportError;

/// Factory for per-attempt channel sessions.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    /// Open a producer session against the given topic.
    async fn producer(&self, topic: &str) -> Result<Box<dyn ProducerSession>, TransportError>;

    /// Open a consumer session in the given group. A group with no
    /// committed progress starts from the earliest retained offset, so
    /// records published moments earlier are visible.
    async fn consumer(
        &self,
        topic: &str,
        group_id: &str,
    ) -> Result<Box<dyn ConsumerSession>, TransportError>;
}

/// One producer connection, scoped to a single publish attempt.
#[async_trait]
pub trait ProducerSession: Send {
    /// Send one encoded record.
    async fn send(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Block until every sent record is acknowledged by the channel.
    async fn flush(&mut self) -> Result<(), TransportError>;
}

/// One consumer subscription, scoped to a single consume attempt.
#[async_trait]
pub trait ConsumerSession: Send {
    /// Receive the next payload, or `None` when `timeout` expires with
    /// nothing available.
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;

    /// Commit progress for everything received on this session so far.
    async fn commit(&mut self) -> Result<(), TransportError>;
}
