//! In-memory channel transport for bridge tests.
//!
//! Backs publish and consume with a Vec-based topic log, scriptable
//! per-session failures, and open-session accounting so tests can assert
//! that the retry paths never leak a connection. The log models a single
//! partition: offsets are positions, a fresh consumer group starts at
//! zero (the earliest retained offset), and commits store the group's next
//! position.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;
use crate::transport::{ChannelConnector, ConsumerSession, ProducerSession};

/// Scripted behavior for one producer session. Sessions beyond the script
/// queue behave as `Ok`.
#[derive(Debug, Clone, Copy)]
pub enum ProducerScript {
    /// Every operation succeeds
    Ok,
    /// The session fails to open
    FailConnect,
    /// The session opens and fails on the send after `n` successful sends
    FailSendAfter(usize),
    /// Sends succeed, the final flush fails
    FailFlush,
}

/// Scripted behavior for one consumer session. Sessions beyond the script
/// queue behave as `Ok`.
#[derive(Debug, Clone, Copy)]
pub enum ConsumerScript {
    /// Every operation succeeds
    Ok,
    /// The session fails to open
    FailConnect,
    /// The session opens and fails on the poll after `n` successful polls
    FailPollAfter(usize),
    /// Polls succeed, the final commit fails
    FailCommit,
}

#[derive(Default)]
struct ChannelState {
    topics: Mutex<HashMap<String, Vec<Vec<u8>>>>,
    /// (group, topic) -> next position to read
    committed: Mutex<HashMap<(String, String), usize>>,
    producer_scripts: Mutex<VecDeque<ProducerScript>>,
    consumer_scripts: Mutex<VecDeque<ConsumerScript>>,
    open_sessions: AtomicUsize,
}

/// In-memory channel implementing [`ChannelConnector`].
#[derive(Clone, Default)]
pub struct MemoryChannel {
    state: Arc<ChannelState>,
}

impl MemoryChannel {
    /// Create an empty channel with no scripted failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue scripted behaviors for upcoming producer sessions.
    pub fn script_producer(&self, scripts: impl IntoIterator<Item = ProducerScript>) {
        self.state
            .producer_scripts
            .lock()
            .unwrap()
            .extend(scripts);
    }

    /// Queue scripted behaviors for upcoming consumer sessions.
    pub fn script_consumer(&self, scripts: impl IntoIterator<Item = ConsumerScript>) {
        self.state
            .consumer_scripts
            .lock()
            .unwrap()
            .extend(scripts);
    }

    /// Append a raw payload to a topic, bypassing the producer path.
    pub fn push_raw(&self, topic: &str, payload: &[u8]) {
        self.state
            .topics
            .lock()
            .unwrap()
            .entry(topic.to_string())
            .or_default()
            .push(payload.to_vec());
    }

    /// All payloads currently in a topic, in append order.
    pub fn payloads(&self, topic: &str) -> Vec<Vec<u8>> {
        self.state
            .topics
            .lock()
            .unwrap()
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of payloads currently in a topic.
    pub fn payload_count(&self, topic: &str) -> usize {
        self.payloads(topic).len()
    }

    /// Committed next position for a group on a topic, if any.
    pub fn committed_offset(&self, group: &str, topic: &str) -> Option<usize> {
        self.state
            .committed
            .lock()
            .unwrap()
            .get(&(group.to_string(), topic.to_string()))
            .copied()
    }

    /// Sessions currently open. Zero once every publish/consume call has
    /// returned, whatever the outcome.
    pub fn open_sessions(&self) -> usize {
        self.state.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelConnector for MemoryChannel {
    async fn producer(&self, topic: &str) -> Result<Box<dyn ProducerSession>, TransportError> {
        let script = self
            .state
            .producer_scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ProducerScript::Ok);

        if matches!(script, ProducerScript::FailConnect) {
            return Err(TransportError::Connect(
                "scripted producer connect failure".to_string(),
            ));
        }

        Ok(Box::new(MemoryProducerSession {
            guard: SessionGuard::open(Arc::clone(&self.state)),
            topic: topic.to_string(),
            script,
            sends: 0,
        }))
    }

    async fn consumer(
        &self,
        topic: &str,
        group_id: &str,
    ) -> Result<Box<dyn ConsumerSession>, TransportError> {
        let script = self
            .state
            .consumer_scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ConsumerScript::Ok);

        if matches!(script, ConsumerScript::FailConnect) {
            return Err(TransportError::Connect(
                "scripted consumer connect failure".to_string(),
            ));
        }

        let position = self
            .state
            .committed
            .lock()
            .unwrap()
            .get(&(group_id.to_string(), topic.to_string()))
            .copied()
            .unwrap_or(0);

        Ok(Box::new(MemoryConsumerSession {
            guard: SessionGuard::open(Arc::clone(&self.state)),
            topic: topic.to_string(),
            group: group_id.to_string(),
            script,
            position,
            polls: 0,
        }))
    }
}

/// Open-session accounting, decremented on drop so every exit path of a
/// bridge call releases its session.
struct SessionGuard {
    state: Arc<ChannelState>,
}

impl SessionGuard {
    fn open(state: Arc<ChannelState>) -> Self {
        state.open_sessions.fetch_add(1, Ordering::SeqCst);
        Self { state }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.state.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MemoryProducerSession {
    guard: SessionGuard,
    topic: String,
    script: ProducerScript,
    sends: usize,
}

#[async_trait]
impl ProducerSession for MemoryProducerSession {
    async fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if let ProducerScript::FailSendAfter(n) = self.script {
            if self.sends == n {
                return Err(TransportError::Send(format!(
                    "scripted send failure after {n} sends"
                )));
            }
        }

        self.guard
            .state
            .topics
            .lock()
            .unwrap()
            .entry(self.topic.clone())
            .or_default()
            .push(payload.to_vec());
        self.sends += 1;

        Ok(())
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        if matches!(self.script, ProducerScript::FailFlush) {
            return Err(TransportError::Send("scripted flush failure".to_string()));
        }
        Ok(())
    }
}

struct MemoryConsumerSession {
    guard: SessionGuard,
    topic: String,
    group: String,
    script: ConsumerScript,
    position: usize,
    polls: usize,
}

#[async_trait]
impl ConsumerSession for MemoryConsumerSession {
    async fn poll(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        if let ConsumerScript::FailPollAfter(n) = self.script {
            if self.polls == n {
                return Err(TransportError::Receive(format!(
                    "scripted poll failure after {n} polls"
                )));
            }
        }
        self.polls += 1;

        let next = self
            .guard
            .state
            .topics
            .lock()
            .unwrap()
            .get(&self.topic)
            .and_then(|log| log.get(self.position).cloned());

        if next.is_some() {
            self.position += 1;
        }

        Ok(next)
    }

    async fn commit(&mut self) -> Result<(), TransportError> {
        if matches!(self.script, ConsumerScript::FailCommit) {
            return Err(TransportError::Commit(
                "scripted commit failure".to_string(),
            ));
        }

        self.guard
            .state
            .committed
            .lock()
            .unwrap()
            .insert((self.group.clone(), self.topic.clone()), self.position);

        Ok(())
    }
}
