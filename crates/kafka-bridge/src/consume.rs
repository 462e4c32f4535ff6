//! Bounded consumption with bounded retry.

use schema_core::Record;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, TransportError};
use crate::retry::{self, RetryPolicy};
use crate::transport::ChannelConnector;
use crate::wire;

/// Outcome of a successful consume call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeReport {
    /// Records delivered, in the order the channel handed them over. This
    /// may differ from publish order on partitioned topics.
    pub records: Vec<Record>,
    /// Attempts made, including the successful one
    pub attempts_made: u32,
}

/// Consume up to `max_records` records from the configured topic.
///
/// Each attempt opens a fresh subscription in the configured consumer
/// group, positioned at the earliest retained offset when the group has no
/// committed progress. Polling stops once `max_records` are collected;
/// progress is committed for exactly the records returned. An idle poll
/// with nothing collected yet counts as a retryable timeout against the
/// attempt budget; once at least one record has arrived, an idle poll ends
/// the call with what was collected.
pub async fn consume(
    config: &BridgeConfig,
    connector: &dyn ChannelConnector,
    max_records: usize,
    cancel: &CancellationToken,
) -> Result<ConsumeReport, BridgeError> {
    let policy = RetryPolicy::new(config.max_attempts, config.backoff());
    let poll_timeout = config.poll_timeout();

    let (records, attempts_made) = retry::run(policy, cancel, |attempt| async move {
        debug!(
            "Consume attempt {attempt}: up to {max_records} records from '{}' as group '{}'",
            config.topic, config.group_id
        );
        let mut session = connector.consumer(&config.topic, &config.group_id).await?;
        let mut records = Vec::with_capacity(max_records);

        while records.len() < max_records {
            match session.poll(poll_timeout).await? {
                Some(payload) => records.push(wire::decode_record(&payload)?),
                None if records.is_empty() => return Err(TransportError::Timeout.into()),
                None => break,
            }
        }

        session.commit().await?;
        Ok(records)
    })
    .await?;

    info!(
        "Consumed {} records from '{}' in {attempts_made} attempt(s)",
        records.len(),
        config.topic
    );

    Ok(ConsumeReport {
        records,
        attempts_made,
    })
}
