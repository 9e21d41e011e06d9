//! Deep structural equality over decoded JSON values.
//!
//! Used by the diff engine to decide whether a key changed. Equality requires
//! the same dynamic type on both sides; numbers are compared by numeric value
//! (so `1` equals `1.0`), with no tolerance beyond that.

use serde_json::Value;

/// Returns `true` if the two values are deeply equal.
///
/// Objects must have equal key-sets with pairwise-equal values; arrays equal
/// length and pairwise equality by position; scalars exact value equality.
/// Values of different dynamic types are never equal.
pub fn matches_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => matches_array(x, y),
        (Value::Object(x), Value::Object(y)) => {
            if x.len() != y.len() {
                return false;
            }
            y.iter().all(|(key, bv)| match x.get(key) {
                Some(av) => matches_value(av, bv),
                None => false,
            })
        }
        _ => false,
    }
}

/// Returns `true` if the two arrays have equal length and pairwise-equal
/// elements.
pub fn matches_array(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| matches_value(x, y))
}

// ── Tests ─────────────────────────────────────────────────────────────────
