//! The intermediate value tree shared by the parser, the encoder and the writer.
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`].
//! A node can only be pushed after all of its children, so every child id is
//! smaller than its parent's id and the tree cannot contain a cycle.
//!
//! ```rust
//! use serde_cybuf::{parse, Node};
//!
//! let tree = parse("{Name: \"cybuf\" Tags: [1 2]}").unwrap();
//! match tree.node(tree.root()) {
//!     Node::Object(entries) => assert_eq!(entries.len(), 2),
//!     _ => unreachable!(),
//! }
//! ```

use crate::value::ValueKind;
use crate::{CybufMap, CybufOptions, Number, Value};

/// Index of a node inside its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the value tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Object(Vec<(String, NodeId)>),
    Array(Vec<NodeId>),
    String(String),
    Number(Number),
    Bool(bool),
    Nil,
}

impl Node {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Node::Object(_) => ValueKind::Object,
            Node::Array(_) => ValueKind::Array,
            Node::String(_) => ValueKind::String,
            Node::Number(_) => ValueKind::Number,
            Node::Bool(_) => ValueKind::Bool,
            Node::Nil => ValueKind::Nil,
        }
    }
}

/// Append-only node storage used while a tree is being built.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Arena {
            nodes: Vec::with_capacity(32),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Seals the arena. `root` must be the id of the last node pushed.
    pub(crate) fn finish(self, root: NodeId) -> Tree {
        debug_assert_eq!(root.0 + 1, self.nodes.len());
        Tree {
            nodes: self.nodes,
            root,
        }
    }
}

/// A complete, immutable value tree with a single root.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was handed out by a different tree and is out of bounds.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the tree to CyBuf text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_cybuf::{parse, CybufOptions};
    ///
    /// let tree = parse("{ A : 1\n\n B:[ 2 ] }").unwrap();
    /// assert_eq!(tree.render(&CybufOptions::new()), "{A: 1 B: [2]}");
    /// ```
    #[must_use]
    pub fn render(&self, options: &CybufOptions) -> String {
        crate::writer::render(self, options)
    }

    /// Builds a tree holding `value`.
    ///
    /// Unlike going through the serializer, keys are taken as they are: a
    /// [`Value`] may hold keys that could never be written as barewords, and
    /// they still decode.
    ///
    /// ```rust
    /// use serde_cybuf::{cybuf, Node, Tree};
    ///
    /// let tree = Tree::from_value(&cybuf!({ "first name": "Ada" }));
    /// match tree.node(tree.root()) {
    ///     Node::Object(entries) => assert_eq!(entries[0].0, "first name"),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Tree {
        let mut arena = Arena::new();
        let root = push_value(&mut arena, value);
        arena.finish(root)
    }

    /// Materializes the subtree under `id` as a generic [`Value`].
    ///
    /// Duplicate keys collapse with the last occurrence winning.
    #[must_use]
    pub fn to_value(&self, id: NodeId) -> Value {
        match self.node(id) {
            Node::Nil => Value::Nil,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Array(items) => Value::Array(items.iter().map(|&c| self.to_value(c)).collect()),
            Node::Object(entries) => {
                let mut map = CybufMap::with_capacity(entries.len());
                for (key, child) in entries {
                    map.insert(key.clone(), self.to_value(*child));
                }
                Value::Object(map)
            }
        }
    }
}

fn push_value(arena: &mut Arena, value: &Value) -> NodeId {
    let node = match value {
        Value::Nil => Node::Nil,
        Value::Bool(b) => Node::Bool(*b),
        Value::Number(n) => Node::Number(*n),
        Value::String(s) => Node::String(s.clone()),
        Value::Array(items) => Node::Array(items.iter().map(|v| push_value(arena, v)).collect()),
        Value::Object(map) => Node::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), push_value(arena, v)))
                .collect(),
        ),
    };
    arena.push(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_precede_parent() {
        let mut arena = Arena::new();
        let a = arena.push(Node::Number(Number::Integer(1)));
        let b = arena.push(Node::Nil);
        let root = arena.push(Node::Array(vec![a, b]));
        let tree = arena.finish(root);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root(), root);
        assert!(a < root && b < root);
        assert_eq!(tree.node(root).kind(), ValueKind::Array);
    }

    #[test]
    fn test_to_value_last_key_wins() {
        let mut arena = Arena::new();
        let first = arena.push(Node::Number(Number::Integer(1)));
        let second = arena.push(Node::Number(Number::Integer(2)));
        let root = arena.push(Node::Object(vec![
            ("k".to_string(), first),
            ("k".to_string(), second),
        ]));
        let value = arena.finish(root).to_value(root);

        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("k").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_from_value_keeps_any_key() {
        let value = crate::cybuf!({ "first name": 1, tags: ["a", nil] });
        let tree = Tree::from_value(&value);
        assert_eq!(tree.root().index(), tree.len() - 1);
        assert_eq!(tree.to_value(tree.root()), value);
    }
}
