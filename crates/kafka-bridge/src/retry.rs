//! Bounded retry with fixed back-off and cancellable waits.
//!
//! Both bridge operations run the same attempt loop:
//!
//! ```text
//! Idle ──▶ Connecting ──▶ Active ──▶ Succeeded
//!              ▲   │          │
//!              │   ▼          ▼
//!              └─ Retrying ◀──┘   (budget left: back off, reconnect)
//!                     │
//!                     ▼
//!                  Failed          (budget exhausted)
//! ```
//!
//! The attempt counter is first-class: callers get `attempts_made` back on
//! success and failure alike, and cancellation interrupts both the active
//! attempt and the back-off wait.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{BridgeError, TransportError};
use crate::wire::WireError;

/// Retry policy shared by publish and consume.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Clamped to at least one.
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// Failure of a single attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Recoverable transport fault; retried while the budget lasts.
    Transport(TransportError),
    /// Terminal failure; surfaced immediately without retry.
    Fatal(BridgeError),
}

impl From<TransportError> for AttemptError {
    fn from(err: TransportError) -> Self {
        AttemptError::Transport(err)
    }
}

impl From<WireError> for AttemptError {
    fn from(err: WireError) -> Self {
        AttemptError::Fatal(BridgeError::Codec(err))
    }
}

/// Run `attempt` under the policy.
///
/// Returns the first successful attempt's value together with the number of
/// attempts made. A transport failure on the last budgeted attempt becomes
/// [`BridgeError::Channel`] carrying that failure and the attempt count.
/// Cancellation aborts the in-flight attempt (dropping its future releases
/// the session) or the back-off wait, and surfaces [`BridgeError::Cancelled`].
pub async fn run<T, F, Fut>(
    policy: RetryPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<(T, u32), BridgeError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts_made = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }

        attempts_made += 1;
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
            outcome = attempt(attempts_made) => outcome,
        };

        match outcome {
            Ok(value) => return Ok((value, attempts_made)),
            Err(AttemptError::Fatal(err)) => return Err(err),
            Err(AttemptError::Transport(cause)) if attempts_made >= max_attempts => {
                return Err(BridgeError::Channel {
                    cause,
                    attempts_made,
                });
            }
            Err(AttemptError::Transport(cause)) => {
                warn!(
                    "Attempt {attempts_made}/{max_attempts} failed, retrying in {:?}: {cause}",
                    policy.backoff
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
                    _ = tokio::time::sleep(policy.backoff) => {}
                }
            }
        }
    }
}
