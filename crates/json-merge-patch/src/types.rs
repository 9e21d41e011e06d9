//! Core types for the merge engine: the error taxonomy, merge options, and
//! structural path helpers.

use thiserror::Error;

use crate::mergers::{Merger, MergerRegistry};

// ── Error ─────────────────────────────────────────────────────────────────

/// Errors surfaced by merge and diff operations.
///
/// Messages are stable sentinels, not formatted prose; callers may match on
/// the variant or on the rendered string.
#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    /// The input document is malformed, or its root is neither an object nor
    /// an array.
    #[error("INVALID_DOCUMENT")]
    InvalidDocument,
    /// The input patch is malformed, or its root is neither an object nor an
    /// array.
    #[error("INVALID_PATCH")]
    InvalidPatch,
    /// Diffing an array-rooted document against an object-rooted one (or vice
    /// versa) is undefined.
    #[error("MISMATCHED_TYPES")]
    MismatchedTypes,
    /// A shape accessor or an array-aware merge policy was given a value that
    /// is not an object.
    #[error("NOT_AN_OBJECT")]
    NotAnObject,
    /// A shape accessor or an array-aware merge policy was given a value that
    /// is not an array.
    #[error("NOT_AN_ARRAY")]
    NotAnArray,
    /// A custom [`Merger`] panicked; the panic was caught at the top-level
    /// merge boundary and converted into this error.
    #[error("MERGER_FAULT: {0}")]
    MergerFault(String),
}

// ── Structural paths ──────────────────────────────────────────────────────

/// Appends `segment` to a structural path.
///
/// The root path is the empty string; each object key adds `/key`, and array
/// recursion adds the literal `/-` ("any element"). Paths are matched by
/// exact string equality in the [`MergerRegistry`] — there is no wildcard or
/// ancestor-prefix lookup.
pub fn join_path(base: &str, segment: &str) -> String {
    format!("{base}/{segment}")
}

// ── Options ───────────────────────────────────────────────────────────────

/// Configuration for a merge call.
///
/// An options value is constructed per call site and passed explicitly; there
/// is no ambient global registry.
#[derive(Debug, Default)]
pub struct MergeOptions {
    /// When `false` (the default), the patch is applied to a concrete
    /// document: `null` values delete keys and are pruned from freshly
    /// adopted subtrees. When `true`, two patches are being composed into
    /// one, so `null` deletion markers are preserved verbatim.
    pub merge_merge: bool,
    /// The active per-path policy registry.
    pub mergers: MergerRegistry,
}

impl MergeOptions {
    /// Options with normal (apply-to-document) semantics and the default
    /// registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets merge-merge (patch composition) mode.
    #[must_use]
    pub fn merge_merge(mut self, merge_merge: bool) -> Self {
        self.merge_merge = merge_merge;
        self
    }

    /// Registers a path-scoped merge policy on this options value.
    #[must_use]
    pub fn with_merger(mut self, path: impl Into<String>, merger: Box<dyn Merger>) -> Self {
        self.mergers.register(path, merger);
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mergers::DirectReplace;

    #[test]
    fn join_path_from_root() {
        assert_eq!(join_path("", "a"), "/a");
    }

    #[test]
    fn join_path_nested() {
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(join_path("/a/b", "-"), "/a/b/-");
    }

    #[test]
    fn options_default_is_normal_mode() {
        let opts = MergeOptions::default();
        assert!(!opts.merge_merge);
    }

    #[test]
    fn options_builder_sets_mode_and_mergers() {
        let opts = MergeOptions::new()
            .merge_merge(true)
            .with_merger("/a", Box::new(DirectReplace));
        assert!(opts.merge_merge);
        assert!(opts.mergers.contains("/a"));
    }

    #[test]
    fn error_messages_are_stable_sentinels() {
        assert_eq!(MergeError::InvalidDocument.to_string(), "INVALID_DOCUMENT");
        assert_eq!(MergeError::InvalidPatch.to_string(), "INVALID_PATCH");
        assert_eq!(MergeError::MismatchedTypes.to_string(), "MISMATCHED_TYPES");
        assert_eq!(
            MergeError::MergerFault("boom".to_string()).to_string(),
            "MERGER_FAULT: boom"
        );
    }
}
