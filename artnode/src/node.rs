//! The node contract: one trie position with a compressed prefix, an optional value, and children
//! held in one of four representations sized for 4, 16, 48 or 256 children.
//!
//! Transitions between representations consume the node and return its replacement. The caller
//! must store the returned node wherever the old one lived (the parent's child slot or the tree
//! root); [`Node::grow_in_place`] and [`Node::shrink_in_place`] do that for a `&mut` slot.

use std::fmt;

use tracing::trace;

use crate::error::{Direction, NodeError, Result};
use crate::mapping::NodeMapping;
use crate::mapping::direct_mapping::{DirectMapping, DirectMappingIter};
use crate::mapping::indexed_mapping::{IndexedMapping, IndexedMappingIter};
use crate::mapping::sorted_keyed_mapping::{SortedKeyedMapping, SortedKeyedMappingIter};
use crate::partials::Partial;
use crate::utils::bitset::Bitset64;

/// The four node representations, named by capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Node4,
    Node16,
    Node48,
    Node256,
}

impl NodeKind {
    /// Maximum number of children.
    pub const fn capacity(self) -> usize {
        match self {
            NodeKind::Node4 => 4,
            NodeKind::Node16 => 16,
            NodeKind::Node48 => 48,
            NodeKind::Node256 => 256,
        }
    }

    /// Child count at or below which the node should shrink. Node4 has no smaller form.
    pub const fn floor(self) -> usize {
        match self {
            NodeKind::Node4 => 0,
            NodeKind::Node16 => 4,
            NodeKind::Node48 => 16,
            NodeKind::Node256 => 48,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Node4 => "Node4",
            NodeKind::Node16 => "Node16",
            NodeKind::Node48 => "Node48",
            NodeKind::Node256 => "Node256",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Node<P: Partial, V> {
    pub(crate) prefix: P,
    pub(crate) value: Option<V>,
    pub(crate) content: Content<P, V>,
}

pub(crate) enum Content<P: Partial, V> {
    Node4(SortedKeyedMapping<Node<P, V>, 4>),
    Node16(SortedKeyedMapping<Node<P, V>, 16>),
    Node48(IndexedMapping<Node<P, V>, 48, Bitset64<1>>),
    Node256(DirectMapping<Node<P, V>>),
}

impl<P: Partial, V> Content<P, V> {
    fn kind(&self) -> NodeKind {
        match self {
            Content::Node4(_) => NodeKind::Node4,
            Content::Node16(_) => NodeKind::Node16,
            Content::Node48(_) => NodeKind::Node48,
            Content::Node256(_) => NodeKind::Node256,
        }
    }
}

impl<P: Partial, V> Default for Node<P, V> {
    fn default() -> Self {
        Self::new_4(P::default())
    }
}

impl<P: Partial, V> Node<P, V> {
    #[inline]
    fn with_content(prefix: P, content: Content<P, V>) -> Self {
        Self {
            prefix,
            value: None,
            content,
        }
    }

    /// A childless node holding `value`.
    #[inline]
    pub fn new_leaf(prefix: P, value: V) -> Self {
        let mut node = Self::new_4(prefix);
        node.value = Some(value);
        node
    }

    #[inline]
    pub fn new_inner(prefix: P) -> Self {
        Self::new_4(prefix)
    }

    #[inline]
    pub fn new_4(prefix: P) -> Self {
        Self::with_content(prefix, Content::Node4(SortedKeyedMapping::new()))
    }

    #[inline]
    pub fn new_16(prefix: P) -> Self {
        Self::with_content(prefix, Content::Node16(SortedKeyedMapping::new()))
    }

    #[inline]
    pub fn new_48(prefix: P) -> Self {
        Self::with_content(prefix, Content::Node48(IndexedMapping::new()))
    }

    #[inline]
    pub fn new_256(prefix: P) -> Self {
        Self::with_content(prefix, Content::Node256(DirectMapping::new()))
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.content.kind()
    }

    #[inline]
    pub fn prefix(&self) -> &P {
        &self.prefix
    }

    /// Logical prefix length, which may exceed the bytes the prefix stores.
    #[inline]
    pub fn prefix_len(&self) -> usize {
        self.prefix.len()
    }

    /// Replaces the prefix, returning the old one.
    pub fn set_prefix(&mut self, prefix: P) -> P {
        std::mem::replace(&mut self.prefix, prefix)
    }

    /// Number of leading prefix bytes matching `key[depth..]`. Only the stored bytes of the prefix
    /// take part; beyond them the caller has to check against a full key.
    pub fn check_prefix(&self, key: &[u8], depth: usize) -> usize {
        let rest = key.get(depth..).unwrap_or_default();
        self.prefix.prefix_length_slice(rest)
    }

    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    /// Stores `value` for the key ending at this node, returning the previous one.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    /// True for a node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.n_children() == 0
    }

    pub fn n_children(&self) -> usize {
        match &self.content {
            Content::Node4(km) => km.num_children(),
            Content::Node16(km) => km.num_children(),
            Content::Node48(im) => im.num_children(),
            Content::Node256(dm) => dm.num_children(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.kind().capacity()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.n_children() >= self.capacity()
    }

    /// True once the children fit in the next smaller representation. Never true for Node4.
    #[inline]
    pub fn is_underfull(&self) -> bool {
        match self.kind() {
            NodeKind::Node4 => false,
            kind => self.n_children() <= kind.floor(),
        }
    }

    pub fn find_child(&self, key: u8) -> Option<&Self> {
        match &self.content {
            Content::Node4(km) => km.seek_child(key),
            Content::Node16(km) => km.seek_child(key),
            Content::Node48(im) => im.seek_child(key),
            Content::Node256(dm) => dm.seek_child(key),
        }
    }

    pub fn find_child_mut(&mut self, key: u8) -> Option<&mut Self> {
        match &mut self.content {
            Content::Node4(km) => km.seek_child_mut(key),
            Content::Node16(km) => km.seek_child_mut(key),
            Content::Node48(im) => im.seek_child_mut(key),
            Content::Node256(dm) => dm.seek_child_mut(key),
        }
    }

    /// Adds `child` under `key`.
    ///
    /// # Panics
    ///
    /// If the node is full (grow it first) or `key` already has a child.
    pub fn set_child(&mut self, key: u8, child: Self) {
        assert!(
            !self.is_full(),
            "set_child: {} is full, grow before inserting",
            self.kind()
        );
        match &mut self.content {
            Content::Node4(km) => km.add_child(key, child),
            Content::Node16(km) => km.add_child(key, child),
            Content::Node48(im) => im.add_child(key, child),
            Content::Node256(dm) => dm.add_child(key, child),
        }
    }

    /// Removes and returns the child under `key`, or `None` if there is none.
    pub fn del_child(&mut self, key: u8) -> Option<Self> {
        match &mut self.content {
            Content::Node4(km) => km.delete_child(key),
            Content::Node16(km) => km.delete_child(key),
            Content::Node48(im) => im.delete_child(key),
            Content::Node256(dm) => dm.delete_child(key),
        }
    }

    /// Smallest stored partial key `>= key`.
    pub fn next_partial_key(&self, key: u8) -> Result<u8> {
        let found = match &self.content {
            Content::Node4(km) => km.next_key(key),
            Content::Node16(km) => km.next_key(key),
            Content::Node48(im) => im.next_key(key),
            Content::Node256(dm) => dm.next_key(key),
        };
        found.ok_or(NodeError::NotFound {
            partial_key: key,
            direction: Direction::Next,
        })
    }

    /// Largest stored partial key `<= key`.
    pub fn prev_partial_key(&self, key: u8) -> Result<u8> {
        let found = match &self.content {
            Content::Node4(km) => km.prev_key(key),
            Content::Node16(km) => km.prev_key(key),
            Content::Node48(im) => im.prev_key(key),
            Content::Node256(dm) => dm.prev_key(key),
        };
        found.ok_or(NodeError::NotFound {
            partial_key: key,
            direction: Direction::Prev,
        })
    }

    /// Children in ascending partial key order.
    pub fn iter(&self) -> Children<'_, P, V> {
        let inner = match &self.content {
            Content::Node4(km) => ChildrenInner::Node4(km.iter()),
            Content::Node16(km) => ChildrenInner::Node16(km.iter()),
            Content::Node48(im) => ChildrenInner::Node48(im.iter()),
            Content::Node256(dm) => ChildrenInner::Node256(dm.iter()),
        };
        Children { inner }
    }

    pub fn partial_keys(&self) -> Vec<u8> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Moves prefix, value and children into the next larger representation.
    ///
    /// # Panics
    ///
    /// On a Node256.
    pub fn grow(self) -> Self {
        let Node {
            prefix,
            value,
            content,
        } = self;
        let from = content.kind();
        let content = match content {
            Content::Node4(mut km) => Content::Node16(SortedKeyedMapping::from_resized(&mut km)),
            Content::Node16(mut km) => Content::Node48(IndexedMapping::from_sorted_keyed(&mut km)),
            Content::Node48(mut im) => Content::Node256(DirectMapping::from_indexed(&mut im)),
            Content::Node256(_) => panic!("grow: Node256 has no larger representation"),
        };
        let node = Node {
            prefix,
            value,
            content,
        };
        trace!(
            from = %from,
            to = %node.kind(),
            children = node.n_children(),
            prefix_len = node.prefix_len(),
            "grew node"
        );
        node
    }

    /// Moves prefix, value and children into the next smaller representation.
    ///
    /// # Panics
    ///
    /// On a Node4, which collapses through [`Node::into_sole_child`] instead, or if the children
    /// do not fit the smaller representation.
    pub fn shrink(self) -> Self {
        let Node {
            prefix,
            value,
            content,
        } = self;
        let from = content.kind();
        let content = match content {
            Content::Node4(_) => {
                panic!("shrink: Node4 has no smaller representation, collapse it instead")
            }
            Content::Node16(mut km) => Content::Node4(SortedKeyedMapping::from_resized(&mut km)),
            Content::Node48(mut im) => Content::Node16(SortedKeyedMapping::from_indexed(&mut im)),
            Content::Node256(mut dm) => Content::Node48(IndexedMapping::from_direct(&mut dm)),
        };
        let node = Node {
            prefix,
            value,
            content,
        };
        trace!(
            from = %from,
            to = %node.kind(),
            children = node.n_children(),
            prefix_len = node.prefix_len(),
            "shrank node"
        );
        node
    }

    /// [`Node::grow`] for a node reached through its owner's slot.
    pub fn grow_in_place(&mut self) {
        let node = std::mem::take(self);
        *self = node.grow();
    }

    /// [`Node::shrink`] for a node reached through its owner's slot.
    pub fn shrink_in_place(&mut self) {
        let node = std::mem::take(self);
        *self = node.shrink();
    }

    /// Collapses a valueless Node4 with a single child into that child, whose prefix becomes
    /// `self.prefix ++ [partial key] ++ child.prefix`. Any other node comes back in `Err`.
    pub fn into_sole_child(self) -> std::result::Result<Self, Self> {
        if self.value.is_some() || self.kind() != NodeKind::Node4 || self.n_children() != 1 {
            return Err(self);
        }
        let Node {
            prefix,
            value,
            content,
        } = self;
        let mut km = match content {
            Content::Node4(km) => km,
            other => {
                return Err(Node {
                    prefix,
                    value,
                    content: other,
                });
            }
        };
        let Some((key, mut child)) = km.take_sole_child() else {
            return Err(Node {
                prefix,
                value,
                content: Content::Node4(km),
            });
        };
        child.prefix = prefix
            .partial_extended_with(&P::from_slice(&[key]))
            .partial_extended_with(&child.prefix);
        trace!(
            partial_key = key,
            prefix_len = child.prefix_len(),
            "collapsed node into its only child"
        );
        Ok(child)
    }
}

/// Iterator over `(partial key, child)` pairs of a node, returned by [`Node::iter`].
pub struct Children<'a, P: Partial, V> {
    inner: ChildrenInner<'a, P, V>,
}

enum ChildrenInner<'a, P: Partial, V> {
    Node4(SortedKeyedMappingIter<'a, Node<P, V>, 4>),
    Node16(SortedKeyedMappingIter<'a, Node<P, V>, 16>),
    Node48(IndexedMappingIter<'a, Node<P, V>, 48, Bitset64<1>>),
    Node256(DirectMappingIter<'a, Node<P, V>>),
}

impl<'a, P: Partial, V> Iterator for Children<'a, P, V> {
    type Item = (u8, &'a Node<P, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ChildrenInner::Node4(it) => it.next(),
            ChildrenInner::Node16(it) => it.next(),
            ChildrenInner::Node48(it) => it.next(),
            ChildrenInner::Node256(it) => it.next(),
        }
    }
}

impl<P: Partial + fmt::Debug, V: fmt::Debug> fmt::Debug for Node<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("prefix", &self.prefix)
            .field("value", &self.value)
            .field("children", &self.partial_keys())
            .finish()
    }
}
