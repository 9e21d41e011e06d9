//! JSON Merge Patch (RFC 7386) with pluggable per-path merge policies.
//!
//! Three operations over JSON-encoded byte buffers:
//!
//! - [`merge_patch`] — apply a merge patch to a document: present keys
//!   overwrite, `null` keys delete, missing keys are untouched.
//! - [`merge_merge_patches`] — compose two merge patches into a single
//!   equivalent patch (deletion markers survive composition).
//! - [`create_merge_patch`] — diff two documents into the merge patch that
//!   transforms one into the other.
//!
//! Merge behavior is selected per subtree through a [`MergerRegistry`] keyed
//! by structural path strings (`""` for the root, `/key` per object key, `/-`
//! for any array element; exact match only). Built-in policies:
//! [`PatchAndReplace`] (the default RFC 7386 semantics), [`ArrayIndexPatch`]
//! (element-by-element array merge), and [`DirectReplace`].
//!
//! # Example
//!
//! ```
//! use json_merge_patch::{merge_patch, MergeOptions};
//!
//! let doc = br#"{"a":1,"b":2}"#;
//! let patch = br#"{"a":null,"c":3}"#;
//! let merged = merge_patch(doc, patch, &MergeOptions::default()).unwrap();
//!
//! let value: serde_json::Value = serde_json::from_slice(&merged).unwrap();
//! assert_eq!(value, serde_json::json!({"b":2,"c":3}));
//! ```
//!
//! Each call is a pure function of its inputs and options; nothing is shared
//! or persisted between calls. The registry is not synchronized internally —
//! callers sharing one across threads must serialize access themselves.

pub mod cli;
pub mod diff;
pub mod equal;
pub mod merge;
pub mod mergers;
pub mod node;
pub mod types;

pub use diff::create_merge_patch;
pub use equal::{matches_array, matches_value};
pub use merge::{merge_merge_patches, merge_patch, prune_nulls};
pub use mergers::{
    ArrayIndexPatch, DirectReplace, MergeContext, Merger, MergerRegistry, PatchAndReplace,
};
pub use node::{LazyNode, NodeMap};
pub use types::{MergeError, MergeOptions};
