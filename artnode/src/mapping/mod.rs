//! Storage layouts for the (partial key, child) pairs of a node.
//!
//! node-4 and node-16 use [`sorted_keyed_mapping::SortedKeyedMapping`], node-48 uses
//! [`indexed_mapping::IndexedMapping`] and node-256 uses [`direct_mapping::DirectMapping`].

pub mod direct_mapping;
pub mod indexed_mapping;
pub mod sorted_keyed_mapping;

pub trait NodeMapping<N, const NUM_CHILDREN: usize> {
    /// Inserts `node` under a key that is not present. Panics if the mapping is full or the key
    /// is already mapped.
    fn add_child(&mut self, key: u8, node: N);
    fn seek_child(&self, key: u8) -> Option<&N>;
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N>;
    fn delete_child(&mut self, key: u8) -> Option<N>;
    fn num_children(&self) -> usize;
    /// Smallest mapped key `>= key`.
    fn next_key(&self, key: u8) -> Option<u8>;
    /// Largest mapped key `<= key`.
    fn prev_key(&self, key: u8) -> Option<u8>;
    fn width(&self) -> usize {
        NUM_CHILDREN
    }
    fn is_full(&self) -> bool {
        self.num_children() >= self.width()
    }
}
