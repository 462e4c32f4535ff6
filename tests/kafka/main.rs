//! Kafka round-trip E2E tests
//!
//! These tests run against a live broker and skip cleanly when none is
//! reachable, so the rest of the suite stays broker-free.

mod roundtrip;
