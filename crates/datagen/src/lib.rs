//! Type-directed random record synthesis.
//!
//! This crate produces random [`Record`](schema_core::Record)s whose field
//! values are type-consistent with a [`RecordSchema`](schema_core::RecordSchema).
//!
//! # Architecture
//!
//! ```text
//! RecordSchema (schema-core)
//!        │
//!        ▼
//! ┌────────────────────┐
//! │ RecordSynthesizer  │
//! │                    │
//! │  - schema          │
//! │  - rng (StdRng)    │
//! └─────────┬──────────┘
//!           │
//!           ▼
//!     Record { field name → FieldValue }
//! ```
//!
//! # Concurrency
//!
//! The random source is confined per synthesizer: parallel workers each own
//! a [`RecordSynthesizer`] (or pass their own `&mut impl Rng` to the free
//! functions), so concurrent synthesis never shares RNG state.
//!
//! # Example
//!
//! ```rust
//! use datagen::RecordSynthesizer;
//! use schema_core::RecordSchema;
//!
//! let schema = RecordSchema::from_json(r#"{
//!     "name": "User",
//!     "fields": [{"name": "id", "type": "int"}]
//! }"#).unwrap();
//!
//! let mut synthesizer = RecordSynthesizer::with_seed(schema, 42);
//! let record = synthesizer.next_record();
//! assert!(record.contains_key("id"));
//! ```

pub mod synth;

// Re-exports for convenience
pub use synth::{synthesize_record, synthesize_value, RecordSynthesizer, SynthesisError};
