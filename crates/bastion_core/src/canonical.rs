//! Canonical encoding for content addressing.
//!
//! Produces compact JSON with object keys sorted byte-wise, no
//! whitespace, and arrays in their original order. Two values that differ
//! only in key insertion order encode to identical bytes. Floating point
//! numbers are rejected since their textual form is not stable.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable value to canonical bytes
///
/// # Errors
///
/// Returns error if the value cannot be represented as JSON or contains
/// a floating point number
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> CoreResult<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    value_to_canonical_bytes(&value)
}

/// Encode an already-built JSON value to canonical bytes
///
/// # Errors
///
/// Returns error if the value contains a floating point number
pub fn value_to_canonical_bytes(value: &Value) -> CoreResult<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> CoreResult<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_value(item, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        Value::Number(n) if n.is_f64() => {
            return Err(CoreError::NonCanonicalNumber {
                value: n.to_string(),
            });
        }
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}
