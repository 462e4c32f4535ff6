//! JSON wire codec for records.
//!
//! Each record crosses the channel as a UTF-8 JSON object: keys are the
//! field names, values are the JSON number/string/boolean/null matching the
//! field's type tag. This is the exact contract a decoder on the consuming
//! side must parse.

use schema_core::Record;
use thiserror::Error;

/// Error type for wire encoding and decoding.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,
}

/// Encode one record as a UTF-8 JSON object.
pub fn encode_record(record: &Record) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(record)?)
}

/// Decode one record payload.
pub fn decode_record(payload: &[u8]) -> Result<Record, WireError> {
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    if !value.is_object() {
        return Err(WireError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}
