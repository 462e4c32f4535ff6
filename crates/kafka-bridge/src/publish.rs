//! Batch publishing with bounded retry.

use schema_core::Record;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::retry::{self, RetryPolicy};
use crate::transport::ChannelConnector;
use crate::wire;

/// Outcome of a successful publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Records delivered to the channel
    pub records_sent: usize,
    /// Attempts made, including the successful one
    pub attempts_made: u32,
}

/// Publish a batch of records to the configured topic.
///
/// Records are encoded once up front, then each attempt opens a fresh
/// producer session, sends the records in batch order, and flushes before
/// closing. Every attempt resends the entire batch: a failure after a
/// partial send retries everything, so the channel may see duplicates
/// (at-least-once). Connection resources are scoped to the attempt and
/// released on every exit path, including cancellation.
pub async fn publish(
    batch: &[Record],
    config: &BridgeConfig,
    connector: &dyn ChannelConnector,
    cancel: &CancellationToken,
) -> Result<PublishReport, BridgeError> {
    let encoded: Vec<Vec<u8>> = batch
        .iter()
        .map(wire::encode_record)
        .collect::<Result<_, _>>()?;

    let policy = RetryPolicy::new(config.max_attempts, config.backoff());
    let (records_sent, attempts_made) = retry::run(policy, cancel, |attempt| {
        let encoded = &encoded;
        async move {
            debug!(
                "Publish attempt {attempt}: {} records to '{}'",
                encoded.len(),
                config.topic
            );
            let mut session = connector.producer(&config.topic).await?;
            for payload in encoded {
                session.send(payload).await?;
            }
            session.flush().await?;
            Ok(encoded.len())
        }
    })
    .await?;

    info!(
        "Published {records_sent} records to '{}' in {attempts_made} attempt(s)",
        config.topic
    );

    Ok(PublishReport {
        records_sent,
        attempts_made,
    })
}
