//! String-level wrappers used by the binary entry points.
//!
//! Both take JSON text in and hand JSON text back, using default merge
//! options; library consumers wanting path-scoped policies or merge-merge
//! mode should call [`crate::merge_patch`] directly.

use crate::diff::create_merge_patch;
use crate::merge::merge_patch;
use crate::types::{MergeError, MergeOptions};

/// Apply a merge patch to a document, both given as JSON text.
pub fn apply_merge_patch(doc: &str, patch: &str) -> Result<String, MergeError> {
    let merged = merge_patch(doc.as_bytes(), patch.as_bytes(), &MergeOptions::default())?;
    Ok(String::from_utf8_lossy(&merged).into_owned())
}

/// Compute the merge patch transforming `original` into `modified`, both
/// given as JSON text.
pub fn diff_merge_patch(original: &str, modified: &str) -> Result<String, MergeError> {
    let patch = create_merge_patch(original.as_bytes(), modified.as_bytes())?;
    Ok(String::from_utf8_lossy(&patch).into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────
