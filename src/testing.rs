//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

// Unique identifiers for parallel test execution
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique test identifier so parallel runs never share topics
/// or consumer groups.
pub fn generate_test_id() -> u64 {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64;
    let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    timestamp.wrapping_add(counter)
}

/// Broker endpoints for integration tests.
///
/// Overridable via the `KAFKA_BROKERS` environment variable
/// (comma-separated `host:port` list); defaults to `localhost:9092`.
pub fn kafka_brokers() -> Vec<String> {
    std::env::var("KAFKA_BROKERS")
        .unwrap_or_else(|_| "localhost:9092".to_string())
        .split(',')
        .map(str::to_string)
        .collect()
}
