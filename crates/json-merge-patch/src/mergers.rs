//! Per-path merge policies and their registry.
//!
//! A [`Merger`] decides how a patch subtree is combined with the document
//! subtree at one structural path. The [`MergerRegistry`] maps path strings
//! to policies; lookup never fails, falling back to the default policy
//! ([`PatchAndReplace`]) when no path-specific entry exists. Paths are
//! matched by exact string equality only — an override registered at `/a/-`
//! applies to neither `/a/0` nor `/a/b`.

use std::collections::HashMap;
use std::fmt;

use crate::merge::prune_nulls;
use crate::node::LazyNode;
use crate::types::{join_path, MergeError};

// ── Context ───────────────────────────────────────────────────────────────

/// Per-recursion merge state threaded through [`Merger`] calls.
pub struct MergeContext<'a> {
    /// Structural path of the subtree being merged. Root is the empty string.
    pub path: String,
    /// Whether two patches are being composed rather than a patch applied to
    /// a document. See [`crate::MergeOptions::merge_merge`].
    pub merge_merge: bool,
    /// The active registry, consulted for every recursive step.
    pub mergers: &'a MergerRegistry,
}

impl<'a> MergeContext<'a> {
    /// Context for the child subtree at `segment` (an object key, or `-` for
    /// any array element).
    pub fn child(&self, segment: &str) -> MergeContext<'a> {
        MergeContext {
            path: join_path(&self.path, segment),
            merge_merge: self.merge_merge,
            mergers: self.mergers,
        }
    }
}

// ── Merger trait & registry ───────────────────────────────────────────────

/// A merge strategy for one subtree.
///
/// Implementations mutate `cur` in place, consuming the patch subtree. Errors
/// abort the entire merge call; there is no partial-success result.
pub trait Merger {
    /// Merge `patch` into `cur` at `ctx.path`.
    fn merge(
        &self,
        cur: &mut LazyNode,
        patch: LazyNode,
        ctx: &MergeContext<'_>,
    ) -> Result<(), MergeError>;
}

/// Exact-match mapping from structural path to merge policy.
pub struct MergerRegistry {
    entries: HashMap<String, Box<dyn Merger>>,
    default: Box<dyn Merger>,
}

impl MergerRegistry {
    /// An empty registry backed by the [`PatchAndReplace`] default policy.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default: Box::new(PatchAndReplace),
        }
    }

    /// Registers `merger` for `path`, overwriting any prior registration at
    /// that path. Always returns `true`.
    pub fn register(&mut self, path: impl Into<String>, merger: Box<dyn Merger>) -> bool {
        self.entries.insert(path.into(), merger);
        true
    }

    /// Looks up the policy for `path`, falling back to the default. Never
    /// fails.
    pub fn get(&self, path: &str) -> &dyn Merger {
        match self.entries.get(path) {
            Some(merger) => merger.as_ref(),
            None => self.default.as_ref(),
        }
    }

    /// Returns `true` if a path-specific policy is registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

impl Default for MergerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MergerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        f.debug_struct("MergerRegistry").field("paths", &paths).finish()
    }
}

// ── Built-in policies ─────────────────────────────────────────────────────

/// The default policy: RFC 7386 object merge, wholesale replacement for
/// everything else.
///
/// For object/object pairs, every patch key is processed: `null` deletes the
/// key (or sets it to a literal `null` in merge-merge mode), absent or
/// null-valued keys adopt the patch value (pruning embedded nulls unless in
/// merge-merge mode), and present keys recurse through the registry at the
/// extended path. If either side is not object-shaped, the patch replaces the
/// current value.
pub struct PatchAndReplace;

impl Merger for PatchAndReplace {
    fn merge(
        &self,
        cur: &mut LazyNode,
        mut patch: LazyNode,
        ctx: &MergeContext<'_>,
    ) -> Result<(), MergeError> {
        if cur.as_object().is_err() {
            // Current value is an array, scalar, or null: the patch wins.
            if !ctx.merge_merge {
                prune_nulls(&mut patch);
            }
            *cur = patch;
            return Ok(());
        }
        let patch_map = match patch.into_object() {
            Ok(map) => map,
            Err(other) => {
                // Non-object patch replaces the whole object.
                *cur = other;
                return Ok(());
            }
        };
        let cur_map = cur.as_object()?;
        for (key, mut value) in patch_map {
            if value.is_null() {
                if ctx.merge_merge {
                    cur_map.insert(key, LazyNode::Null);
                } else {
                    cur_map.shift_remove(&key);
                }
                continue;
            }
            match cur_map.get_mut(&key) {
                Some(existing) if !existing.is_null() => {
                    let child = ctx.child(&key);
                    ctx.mergers.get(&child.path).merge(existing, value, &child)?;
                }
                _ => {
                    // Freshly adopted subtree: embedded nulls have no
                    // deletion target, so they are normalized away.
                    if !ctx.merge_merge {
                        prune_nulls(&mut value);
                    }
                    cur_map.insert(key, value);
                }
            }
        }
        Ok(())
    }
}

/// Opt-in policy merging arrays element-by-element by index.
///
/// Elements present in both arrays are merged recursively through the
/// registry path `<path>/-`; a longer patch appends its tail, a longer
/// current array keeps its tail. Null elements are dropped from the result
/// (arrays encode deletion by omission, not by sentinel). Either side not
/// being array-shaped is an error.
pub struct ArrayIndexPatch;

impl Merger for ArrayIndexPatch {
    fn merge(
        &self,
        cur: &mut LazyNode,
        patch: LazyNode,
        ctx: &MergeContext<'_>,
    ) -> Result<(), MergeError> {
        let patch_items = match patch.into_array() {
            Ok(items) => items,
            Err(_) => return Err(MergeError::NotAnArray),
        };
        let cur_items = cur.as_array()?;
        let child = ctx.child("-");
        let merger = ctx.mergers.get(&child.path);
        let mut patch_iter = patch_items.into_iter();
        for slot in cur_items.iter_mut() {
            match patch_iter.next() {
                Some(elem) => merger.merge(slot, elem, &child)?,
                None => break,
            }
        }
        cur_items.extend(patch_iter);
        cur_items.retain(|item| !item.is_null());
        Ok(())
    }
}

/// Opt-in policy: the patch unconditionally replaces the current value.
pub struct DirectReplace;

impl Merger for DirectReplace {
    fn merge(
        &self,
        cur: &mut LazyNode,
        mut patch: LazyNode,
        ctx: &MergeContext<'_>,
    ) -> Result<(), MergeError> {
        if !ctx.merge_merge {
            prune_nulls(&mut patch);
        }
        *cur = patch;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
