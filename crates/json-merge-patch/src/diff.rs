//! Diff engine: compute a merge patch from two document snapshots.
//!
//! [`create_merge_patch`] produces the patch whose application to the
//! original document reproduces the modified one. The diff is field-by-field,
//! not a tree-edit-distance minimizer: unchanged sub-objects are omitted,
//! deletions are encoded as `null`, and arrays differing in any element or
//! length are replaced wholesale.

use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::equal::{matches_array, matches_value};
use crate::types::MergeError;

/// Returns the merge patch transforming `original` into `modified`.
///
/// Accepts either two object-rooted JSON documents, or two JSON arrays of
/// documents. For arrays the pairing is strictly positional — equal lengths
/// are required ([`MergeError::InvalidDocument`] otherwise) and the output is
/// a JSON array of the per-pair patches. One array root and one object root
/// is [`MergeError::MismatchedTypes`].
pub fn create_merge_patch(original: &[u8], modified: &[u8]) -> Result<Vec<u8>, MergeError> {
    let original_is_array = resembles_json_array(original);
    let modified_is_array = resembles_json_array(modified);
    if original_is_array && modified_is_array {
        return create_array_merge_patch(original, modified);
    }
    if !original_is_array && !modified_is_array {
        return create_object_merge_patch(original, modified);
    }
    Err(MergeError::MismatchedTypes)
}

/// Whether the byte buffer "appears" to be a JSON array: trimmed first and
/// last bytes are `[` and `]`. False-positives on malformed input are
/// possible; this only picks a code path, full decoding validates later.
fn resembles_json_array(input: &[u8]) -> bool {
    let trimmed = input.trim_ascii();
    trimmed.first() == Some(&b'[') && trimmed.last() == Some(&b']')
}

fn create_object_merge_patch(original: &[u8], modified: &[u8]) -> Result<Vec<u8>, MergeError> {
    let original_doc: Map<String, Value> =
        serde_json::from_slice(original).map_err(|_| MergeError::InvalidDocument)?;
    let modified_doc: Map<String, Value> =
        serde_json::from_slice(modified).map_err(|_| MergeError::InvalidDocument)?;
    let patch = diff(&original_doc, &modified_doc);
    serde_json::to_vec(&Value::Object(patch)).map_err(|_| MergeError::InvalidDocument)
}

fn create_array_merge_patch(original: &[u8], modified: &[u8]) -> Result<Vec<u8>, MergeError> {
    let original_docs: Vec<Box<RawValue>> =
        serde_json::from_slice(original).map_err(|_| MergeError::InvalidDocument)?;
    let modified_docs: Vec<Box<RawValue>> =
        serde_json::from_slice(modified).map_err(|_| MergeError::InvalidDocument)?;

    if original_docs.len() != modified_docs.len() {
        return Err(MergeError::InvalidDocument);
    }

    let mut result = Vec::with_capacity(original_docs.len());
    for (original_doc, modified_doc) in original_docs.iter().zip(&modified_docs) {
        let patch =
            create_object_merge_patch(original_doc.get().as_bytes(), modified_doc.get().as_bytes())?;
        let raw = serde_json::from_slice::<Box<RawValue>>(&patch)
            .map_err(|_| MergeError::InvalidDocument)?;
        result.push(raw);
    }

    serde_json::to_vec(&result).map_err(|_| MergeError::InvalidDocument)
}

/// Recursive object diff per RFC 7386 semantics.
///
/// Keys present only in `b` (or with a changed value) map to `b`'s value;
/// keys absent from `b` map to `null`; unchanged keys are omitted, including
/// deep-equal sub-objects (no empty-object entries). A change of dynamic type
/// always replaces wholesale, as does any array difference.
pub fn diff(a: &Map<String, Value>, b: &Map<String, Value>) -> Map<String, Value> {
    let mut into = Map::new();
    for (key, bv) in b {
        let av = match a.get(key) {
            Some(av) => av,
            None => {
                // Value was added.
                into.insert(key.clone(), bv.clone());
                continue;
            }
        };
        if !same_kind(av, bv) {
            // Type changed: replace completely.
            into.insert(key.clone(), bv.clone());
            continue;
        }
        match (av, bv) {
            (Value::Object(ao), Value::Object(bo)) => {
                let nested = diff(ao, bo);
                if !nested.is_empty() {
                    into.insert(key.clone(), Value::Object(nested));
                }
            }
            (Value::Array(aa), Value::Array(ba)) => {
                if !matches_array(aa, ba) {
                    into.insert(key.clone(), bv.clone());
                }
            }
            (Value::Null, Value::Null) => {}
            _ => {
                if !matches_value(av, bv) {
                    into.insert(key.clone(), bv.clone());
                }
            }
        }
    }
    // Deleted keys become null markers, regardless of their original type.
    for key in a.keys() {
        if !b.contains_key(key) {
            into.insert(key.clone(), Value::Null);
        }
    }
    into
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(original: &str, modified: &str) -> Value {
        let out = create_merge_patch(original.as_bytes(), modified.as_bytes()).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn addition_included_as_is() {
        assert_eq!(patch(r#"{"a":1}"#, r#"{"a":1,"b":2}"#), json!({"b":2}));
    }

    #[test]
    fn deletion_encoded_as_null() {
        assert_eq!(patch(r#"{"a":1,"b":2}"#, r#"{"a":1}"#), json!({"b":null}));
        assert_eq!(patch(r#"{"b":[1,2]}"#, "{}"), json!({"b":null}));
    }

    #[test]
    fn unchanged_subtrees_omitted() {
        assert_eq!(
            patch(r#"{"x":{"y":1}}"#, r#"{"x":{"y":1},"z":2}"#),
            json!({"z":2})
        );
    }

    #[test]
    fn nested_changes_produce_nested_diff() {
        assert_eq!(
            patch(r#"{"x":{"y":1,"z":2}}"#, r#"{"x":{"y":9,"z":2}}"#),
            json!({"x":{"y":9}})
        );
    }

    #[test]
    fn arrays_replaced_on_any_difference() {
        assert_eq!(patch(r#"{"a":[1,2]}"#, r#"{"a":[1,3]}"#), json!({"a":[1,3]}));
        assert_eq!(patch(r#"{"a":[1,2]}"#, r#"{"a":[1]}"#), json!({"a":[1]}));
        assert_eq!(patch(r#"{"a":[1,2]}"#, r#"{"a":[1,2]}"#), json!({}));
    }

    #[test]
    fn type_change_replaces_wholesale() {
        assert_eq!(
            patch(r#"{"a":{"x":1}}"#, r#"{"a":[1]}"#),
            json!({"a":[1]})
        );
        assert_eq!(patch(r#"{"a":1}"#, r#"{"a":"1"}"#), json!({"a":"1"}));
    }

    #[test]
    fn both_null_is_no_change() {
        assert_eq!(patch(r#"{"a":null}"#, r#"{"a":null}"#), json!({}));
        assert_eq!(patch(r#"{"a":null}"#, r#"{"a":1}"#), json!({"a":1}));
    }

    #[test]
    fn array_of_documents_diffed_pairwise() {
        assert_eq!(
            patch(r#"[{"a":1},{"b":2}]"#, r#"[{"a":9},{"b":2}]"#),
            json!([{"a":9},{}])
        );
    }

    #[test]
    fn array_of_documents_length_mismatch_rejected() {
        let err = create_merge_patch(br#"[{"a":1}]"#, br#"[{"a":1},{"b":2}]"#);
        assert_eq!(err.unwrap_err(), MergeError::InvalidDocument);
    }

    #[test]
    fn mixed_roots_rejected() {
        let err = create_merge_patch(br#"{"a":1}"#, b"[1]");
        assert_eq!(err.unwrap_err(), MergeError::MismatchedTypes);
        let err = create_merge_patch(b"[1]", br#"{"a":1}"#);
        assert_eq!(err.unwrap_err(), MergeError::MismatchedTypes);
    }

    #[test]
    fn malformed_inputs_rejected() {
        assert_eq!(
            create_merge_patch(b"{oops", br#"{"a":1}"#).unwrap_err(),
            MergeError::InvalidDocument
        );
        assert_eq!(
            create_merge_patch(br#"{"a":1}"#, b"{oops").unwrap_err(),
            MergeError::InvalidDocument
        );
    }

    #[test]
    fn resembles_array_heuristic() {
        assert!(resembles_json_array(b"  [1,2] "));
        assert!(!resembles_json_array(b"{}"));
        assert!(!resembles_json_array(b"[1,2}"));
    }
}
