//! Merge engine entry points and null pruning.
//!
//! [`merge_patch`] applies an RFC 7386-style merge patch to a document;
//! [`merge_merge_patches`] composes two patches into one equivalent patch.
//! Both take and return JSON-encoded byte buffers — callers never observe a
//! partially-merged document.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::node::LazyNode;
use crate::types::{MergeError, MergeOptions};

// ── Null pruning ──────────────────────────────────────────────────────────

/// Recursively strips `null`-valued object entries and drops `null` array
/// elements (compacted, not left as holes) throughout a subtree.
///
/// Invoked when a subtree is freshly adopted into a document under normal
/// semantics: a bare adoption leaves no pre-existing value for embedded nulls
/// to delete, so they must vanish. Idempotent. Under merge-merge semantics
/// pruning is skipped everywhere, so deletion markers survive composition.
pub fn prune_nulls(node: &mut LazyNode) {
    if node.is_object_shaped() {
        if let Ok(map) = node.as_object() {
            map.retain(|_, value| !value.is_null());
            for value in map.values_mut() {
                prune_nulls(value);
            }
        }
    } else if node.is_array_shaped() {
        if let Ok(items) = node.as_array() {
            items.retain(|item| !item.is_null());
            for item in items.iter_mut() {
                prune_nulls(item);
            }
        }
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Merges `patch` into `doc`, returning the merged document.
///
/// Both inputs must be JSON-encoded and object- or array-rooted; a top-level
/// `null` or bare scalar is rejected with [`MergeError::InvalidDocument`] /
/// [`MergeError::InvalidPatch`]. When the two roots have mismatched shapes
/// (one object, one array), the patch wins outright: it is returned after
/// null pruning (object patches keep their nulls in merge-merge mode).
///
/// A panic raised by a custom [`crate::Merger`] is caught here and converted
/// into [`MergeError::MergerFault`]; it never unwinds past this call.
pub fn merge_patch(
    doc: &[u8],
    patch: &[u8],
    opts: &MergeOptions,
) -> Result<Vec<u8>, MergeError> {
    let mut doc: LazyNode =
        serde_json::from_slice(doc).map_err(|_| MergeError::InvalidDocument)?;
    let mut patch: LazyNode =
        serde_json::from_slice(patch).map_err(|_| MergeError::InvalidPatch)?;

    // Merge patch semantics are defined only over objects and arrays at the
    // root; `null` and scalars are neither.
    if !doc.is_object_shaped() && !doc.is_array_shaped() {
        return Err(MergeError::InvalidDocument);
    }
    if !patch.is_object_shaped() && !patch.is_array_shaped() {
        return Err(MergeError::InvalidPatch);
    }

    if doc.is_object_shaped() != patch.is_object_shaped() {
        // Mismatched root shapes: the patch completely replaces the document.
        if patch.is_object_shaped() {
            if !opts.merge_merge {
                prune_nulls(&mut patch);
            }
        } else {
            prune_nulls(&mut patch);
        }
        return serde_json::to_vec(&patch).map_err(|_| MergeError::InvalidPatch);
    }

    let ctx = crate::mergers::MergeContext {
        path: String::new(),
        merge_merge: opts.merge_merge,
        mergers: &opts.mergers,
    };
    let root = opts.mergers.get("");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| root.merge(&mut doc, patch, &ctx)));
    match outcome {
        Ok(Ok(())) => serde_json::to_vec(&doc).map_err(|_| MergeError::InvalidDocument),
        Ok(Err(err)) => Err(err),
        Err(payload) => Err(MergeError::MergerFault(panic_message(payload.as_ref()))),
    }
}

/// Composes two merge patches into a single equivalent patch: applying the
/// result to a document yields the same output as applying `patch1` then
/// `patch2` in succession.
pub fn merge_merge_patches(patch1: &[u8], patch2: &[u8]) -> Result<Vec<u8>, MergeError> {
    let opts = MergeOptions::new().merge_merge(true);
    merge_patch(patch1, patch2, &opts)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unrecognized panic payload".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mergers::{MergeContext, Merger};
    use serde_json::{json, Value};

    fn merged(doc: &str, patch: &str) -> Value {
        let out = merge_patch(doc.as_bytes(), patch.as_bytes(), &MergeOptions::default())
            .unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn null_deletes_key() {
        assert_eq!(merged(r#"{"a":1,"b":2}"#, r#"{"a":null}"#), json!({"b":2}));
    }

    #[test]
    fn fresh_adoption_prunes_nested_nulls() {
        assert_eq!(
            merged("{}", r#"{"a":{"b":null,"c":1}}"#),
            json!({"a":{"c":1}})
        );
    }

    #[test]
    fn arrays_replaced_wholesale_by_default() {
        assert_eq!(merged(r#"{"a":[1,2]}"#, r#"{"a":[3]}"#), json!({"a":[3]}));
    }

    #[test]
    fn mismatched_roots_patch_wins() {
        assert_eq!(merged(r#"{"a":1}"#, "[1,2,3]"), json!([1, 2, 3]));
        assert_eq!(merged("[1,2,3]", r#"{"a":1,"b":null}"#), json!({"a":1}));
    }

    #[test]
    fn mismatched_roots_array_patch_is_null_pruned() {
        assert_eq!(merged(r#"{"a":1}"#, "[1,null,3]"), json!([1, 3]));
    }

    #[test]
    fn mismatched_roots_object_patch_keeps_nulls_in_merge_merge() {
        let out = merge_merge_patches(b"[1,2]", br#"{"a":null}"#).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, json!({"a":null}));
    }

    #[test]
    fn malformed_document_rejected() {
        let err = merge_patch(b"{not json", br#"{"a":1}"#, &MergeOptions::default());
        assert_eq!(err.unwrap_err(), MergeError::InvalidDocument);
    }

    #[test]
    fn malformed_patch_rejected() {
        let err = merge_patch(br#"{"a":1}"#, b"{not json", &MergeOptions::default());
        assert_eq!(err.unwrap_err(), MergeError::InvalidPatch);
    }

    #[test]
    fn null_and_scalar_roots_rejected() {
        let opts = MergeOptions::default();
        assert_eq!(
            merge_patch(b"null", br#"{"a":1}"#, &opts).unwrap_err(),
            MergeError::InvalidDocument
        );
        assert_eq!(
            merge_patch(b"42", br#"{"a":1}"#, &opts).unwrap_err(),
            MergeError::InvalidDocument
        );
        assert_eq!(
            merge_patch(br#"{"a":1}"#, b"null", &opts).unwrap_err(),
            MergeError::InvalidPatch
        );
        assert_eq!(
            merge_patch(br#"{"a":1}"#, br#""str""#, &opts).unwrap_err(),
            MergeError::InvalidPatch
        );
    }

    #[test]
    fn merge_merge_preserves_deletion_markers() {
        let out = merge_merge_patches(br#"{"a":1}"#, br#"{"a":null,"b":2}"#).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, json!({"a":null,"b":2}));
    }

    #[test]
    fn prune_nulls_is_idempotent() {
        let mut node: LazyNode =
            serde_json::from_str(r#"{"a":null,"b":{"c":null,"d":[null,1]},"e":[null]}"#)
                .unwrap();
        prune_nulls(&mut node);
        let once: Value = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        prune_nulls(&mut node);
        let twice: Value = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(once, json!({"b":{"d":[1]},"e":[]}));
        assert_eq!(once, twice);
    }

    #[test]
    fn prune_nulls_leaves_scalars_alone() {
        let mut node: LazyNode = serde_json::from_str("42").unwrap();
        prune_nulls(&mut node);
        assert!(matches!(node, LazyNode::Unparsed(_)));
    }

    struct PanickingMerger;

    impl Merger for PanickingMerger {
        fn merge(
            &self,
            _cur: &mut LazyNode,
            _patch: LazyNode,
            _ctx: &MergeContext<'_>,
        ) -> Result<(), MergeError> {
            panic!("custom merger blew up");
        }
    }

    #[test]
    fn custom_merger_panic_is_contained() {
        let opts = MergeOptions::new().with_merger("/a", Box::new(PanickingMerger));
        let err = merge_patch(br#"{"a":{"x":1}}"#, br#"{"a":{"x":2}}"#, &opts).unwrap_err();
        assert_eq!(
            err,
            MergeError::MergerFault("custom merger blew up".to_string())
        );
    }

    struct FailingMerger;

    impl Merger for FailingMerger {
        fn merge(
            &self,
            _cur: &mut LazyNode,
            _patch: LazyNode,
            _ctx: &MergeContext<'_>,
        ) -> Result<(), MergeError> {
            Err(MergeError::NotAnArray)
        }
    }

    #[test]
    fn merger_error_aborts_whole_call() {
        let opts = MergeOptions::new().with_merger("/a", Box::new(FailingMerger));
        let err = merge_patch(br#"{"a":{"x":1},"b":1}"#, br#"{"a":{"x":2},"b":2}"#, &opts);
        assert_eq!(err.unwrap_err(), MergeError::NotAnArray);
    }
}
