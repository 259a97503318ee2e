//! Adaptive Radix Tree nodes.
//!
//! An ART node stores its children in one of four representations sized for 4, 16, 48 or 256
//! children, keyed by a single byte of the search key (the partial key). [`Node`] exposes one
//! contract over all four: lookup, insertion and removal of children, fullness checks, ordered
//! neighbour queries, and the grow/shrink transitions that move a node between representations.
//!
//! The tree algorithm that drives these transitions lives with the caller:
//!
//! ```
//! use artnode::{DefaultNode, NodeKind};
//!
//! let mut node: DefaultNode<u32> = DefaultNode::default();
//! for key in [9u8, 3, 7, 1, 5] {
//!     if node.is_full() {
//!         node = node.grow();
//!     }
//!     node.set_child(key, DefaultNode::new_leaf(Default::default(), key as u32));
//! }
//! assert_eq!(node.kind(), NodeKind::Node16);
//! assert_eq!(node.partial_keys(), vec![1, 3, 5, 7, 9]);
//! assert_eq!(node.next_partial_key(6), Ok(7));
//! assert_eq!(node.find_child(5).and_then(|c| c.value()), Some(&5));
//! ```

pub mod error;
pub mod mapping;
pub mod node;
pub mod partials;
pub mod stats;
pub mod utils;

pub use error::{Direction, NodeError, Result};
pub use node::{Children, Node, NodeKind};
pub use partials::Partial;
pub use partials::array_partial::ArrPartial;
pub use partials::vector_partial::VectorPartial;
pub use stats::{NodeStats, TreeStats, TreeStatsTrait};

/// Bytes of prefix a [`DefaultNode`] keeps inline.
pub const DEFAULT_PREFIX_CAPACITY: usize = 8;

/// A node with an inline prefix of [`DEFAULT_PREFIX_CAPACITY`] bytes.
pub type DefaultNode<V> = Node<partials::array_partial::ArrPartial<DEFAULT_PREFIX_CAPACITY>, V>;
