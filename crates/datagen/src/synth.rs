//! Value and record synthesizers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema_core::{FieldValue, Record, RecordSchema, TypeTag};

/// Error type for synthesis operations.
///
/// Synthesis is currently total over [`TypeTag`]: unknown types degrade to
/// an explicit null instead of failing. The variant is reserved for a
/// future mode with strict type handling.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Field type has no generation rule
    #[error("Unsupported field type: {0}")]
    UnsupportedType(String),
}

/// Synthesize one random value for the given type tag.
///
/// Value domains:
/// - `Int` - uniform integer in `1..=100`
/// - `String` - `"test_"` followed by a uniform integer in `1..=1000`
/// - `Boolean` - fair coin flip
/// - `Unknown` - explicit null
pub fn synthesize_value<R: Rng>(tag: TypeTag, rng: &mut R) -> FieldValue {
    match tag {
        TypeTag::Int => FieldValue::Int(rng.random_range(1..=100)),
        TypeTag::String => FieldValue::Text(format!("test_{}", rng.random_range(1i64..=1000))),
        TypeTag::Boolean => FieldValue::Bool(rng.random_bool(0.5)),
        TypeTag::Unknown => FieldValue::Null,
    }
}

/// Synthesize one record, one value per schema field, in field order.
///
/// Every field is present in the result: unknown-typed fields map to an
/// explicit null rather than a missing key, so downstream consumers can
/// assert key presence.
pub fn synthesize_record<R: Rng>(schema: &RecordSchema, rng: &mut R) -> Record {
    schema
        .fields
        .iter()
        .map(|field| (field.name.clone(), synthesize_value(field.type_tag, rng)))
        .collect()
}

/// Record synthesizer owning its random source.
///
/// Each instance confines a [`StdRng`], so parallel workers synthesize
/// concurrently by owning one synthesizer each. Records are created fresh
/// per call and carry no identity; no state is retained beyond the RNG.
pub struct RecordSynthesizer {
    schema: RecordSchema,
    rng: StdRng,
}

impl RecordSynthesizer {
    /// Create a synthesizer seeded from OS entropy.
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a synthesizer with a fixed seed for reproducible output.
    pub fn with_seed(schema: RecordSchema, seed: u64) -> Self {
        Self {
            schema,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get a reference to the schema.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Synthesize the next record.
    pub fn next_record(&mut self) -> Record {
        synthesize_record(&self.schema, &mut self.rng)
    }

    /// Synthesize `count` records with no inter-record correlation.
    pub fn batch(&mut self, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.next_record()).collect()
    }
}
