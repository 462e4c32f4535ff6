//! avro-stream
//!
//! A schema-driven test data pipeline: interpret an Avro-style record
//! schema, synthesize random records whose values are type-consistent with
//! it, and round-trip batches of those records through a Kafka topic.
//!
//! # Workspace Crates
//!
//! - `schema-core` - schema model, type tags, field values
//! - `datagen` - type-directed random record synthesis
//! - `kafka-bridge` - publish/consume with bounded retry and back-off
//!
//! This crate adds the model stub codegen and the CLI that glues the
//! pipeline together.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate a Rust model stub from a schema
//! avro-stream generate-model --schema user.avsc --out-dir generated/
//!
//! # Print five random records as JSON lines
//! avro-stream synthesize --schema user.avsc --count 5
//!
//! # Publish a synthesized batch, then read it back
//! avro-stream publish --schema user.avsc --count 5 --topic users
//! avro-stream consume --topic users --max-records 5
//! ```

pub mod codegen;
pub mod testing;

// Re-exports for convenience
pub use datagen::RecordSynthesizer;
pub use kafka_bridge::{BridgeConfig, KafkaConnector};
pub use schema_core::{FieldValue, Record, RecordSchema, SchemaError, TypeTag};
