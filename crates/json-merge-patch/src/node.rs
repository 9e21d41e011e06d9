//! Lazily-decoded JSON value tree.
//!
//! A [`LazyNode`] holds either already-decoded structure or an opaque raw
//! span (`serde_json::value::RawValue`). Decoding is deferred: the raw span
//! is realized into a concrete shape the first time a shape-specific accessor
//! is requested, and the realized shape is then stable for the node's
//! lifetime. Shape probes ([`LazyNode::is_object_shaped`] /
//! [`LazyNode::is_array_shaped`]) inspect the first byte of the span without
//! committing to a decode.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::types::MergeError;

/// The object mapping used for realized object nodes. Insertion-ordered, so
/// re-encoding preserves the order keys were first seen.
pub type NodeMap = IndexMap<String, LazyNode>;

/// A node in a lazily-decoded JSON tree.
///
/// Single-threaded use only: realizing a node mutates it in place and there
/// is no internal synchronization.
#[derive(Debug, Clone)]
pub enum LazyNode {
    /// A syntactically valid but not yet shaped JSON value.
    Unparsed(Box<RawValue>),
    /// A realized JSON object.
    Object(NodeMap),
    /// A realized JSON array.
    Array(Vec<LazyNode>),
    /// A realized scalar (string, number, or bool). Only reachable through
    /// programmatic construction; parsing keeps scalars unparsed.
    Scalar(Value),
    /// A JSON `null`. In a patch this is the deletion sentinel.
    Null,
}

impl LazyNode {
    /// Returns `true` if this node is (or looks like) a JSON object, without
    /// committing to a decode.
    pub fn is_object_shaped(&self) -> bool {
        match self {
            LazyNode::Object(_) => true,
            LazyNode::Unparsed(raw) => raw.get().trim_start().starts_with('{'),
            _ => false,
        }
    }

    /// Returns `true` if this node is (or looks like) a JSON array, without
    /// committing to a decode.
    pub fn is_array_shaped(&self) -> bool {
        match self {
            LazyNode::Array(_) => true,
            LazyNode::Unparsed(raw) => raw.get().trim_start().starts_with('['),
            _ => false,
        }
    }

    /// Returns `true` if this node is JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, LazyNode::Null)
    }

    /// Realizes this node as a mutable object mapping.
    ///
    /// An unparsed object span is decoded exactly once; the decoded mapping
    /// replaces the raw span, so repeated calls reuse it. Fails with
    /// [`MergeError::NotAnObject`] if the underlying value has any other
    /// shape (the node is left untouched in that case).
    pub fn as_object(&mut self) -> Result<&mut NodeMap, MergeError> {
        if let LazyNode::Unparsed(raw) = self {
            if raw.get().trim_start().starts_with('{') {
                let map: NodeMap =
                    serde_json::from_str(raw.get()).map_err(|_| MergeError::NotAnObject)?;
                *self = LazyNode::Object(map);
            }
        }
        match self {
            LazyNode::Object(map) => Ok(map),
            _ => Err(MergeError::NotAnObject),
        }
    }

    /// Realizes this node as a mutable array. Analogous to
    /// [`LazyNode::as_object`]; fails with [`MergeError::NotAnArray`] on any
    /// other shape.
    pub fn as_array(&mut self) -> Result<&mut Vec<LazyNode>, MergeError> {
        if let LazyNode::Unparsed(raw) = self {
            if raw.get().trim_start().starts_with('[') {
                let items: Vec<LazyNode> =
                    serde_json::from_str(raw.get()).map_err(|_| MergeError::NotAnArray)?;
                *self = LazyNode::Array(items);
            }
        }
        match self {
            LazyNode::Array(items) => Ok(items),
            _ => Err(MergeError::NotAnArray),
        }
    }

    /// Consumes this node, realizing it as an object mapping. The node is
    /// handed back unchanged if it is not object-shaped.
    pub fn into_object(mut self) -> Result<NodeMap, Self> {
        if self.as_object().is_err() {
            return Err(self);
        }
        match self {
            LazyNode::Object(map) => Ok(map),
            other => Err(other),
        }
    }

    /// Consumes this node, realizing it as an array. The node is handed back
    /// unchanged if it is not array-shaped.
    pub fn into_array(mut self) -> Result<Vec<LazyNode>, Self> {
        if self.as_array().is_err() {
            return Err(self);
        }
        match self {
            LazyNode::Array(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl From<Value> for LazyNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => LazyNode::Null,
            Value::Object(map) => LazyNode::Object(
                map.into_iter().map(|(k, v)| (k, LazyNode::from(v))).collect(),
            ),
            Value::Array(items) => {
                LazyNode::Array(items.into_iter().map(LazyNode::from).collect())
            }
            scalar => LazyNode::Scalar(scalar),
        }
    }
}

impl<'de> Deserialize<'de> for LazyNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        // A literal null becomes the sentinel variant up front, so callers
        // can test for it without touching the raw span.
        if raw.get().trim() == "null" {
            Ok(LazyNode::Null)
        } else {
            Ok(LazyNode::Unparsed(raw))
        }
    }
}

impl Serialize for LazyNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LazyNode::Unparsed(raw) => raw.serialize(serializer),
            LazyNode::Object(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            LazyNode::Array(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            LazyNode::Scalar(value) => value.serialize(serializer),
            LazyNode::Null => serializer.serialize_unit(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
