use crate::mapping::NodeMapping;
use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::sorted_keyed_mapping::SortedKeyedMapping;
use crate::utils::bitarray::BitArray;
use crate::utils::bitset::{Bitset64, BitsetTrait};

// A mapping from keys to separate child pointers. 256 possible keys mapped to a compact array of
// WIDTH children. Lookup goes through the index table first, then the child slot.
pub struct IndexedMapping<N, const WIDTH: usize, Bitset: BitsetTrait> {
    child_ptr_indexes: Box<BitArray<u8, 256, Bitset64<4>>>,
    children: Box<BitArray<N, WIDTH, Bitset>>,
    pub(crate) num_children: u8,
}

impl<N, const WIDTH: usize, Bitset: BitsetTrait> Default for IndexedMapping<N, WIDTH, Bitset> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize, Bitset: BitsetTrait> IndexedMapping<N, WIDTH, Bitset> {
    pub fn new() -> Self {
        Self {
            child_ptr_indexes: Box::new(BitArray::new()),
            children: Box::new(BitArray::new()),
            num_children: 0,
        }
    }

    pub(crate) fn from_direct(dm: &mut DirectMapping<N>) -> Self {
        assert!(
            dm.num_children() <= WIDTH,
            "cannot fit {} children into an indexed mapping of width {WIDTH}",
            dm.num_children()
        );
        let mut indexed = IndexedMapping::new();
        dm.move_into(&mut indexed);
        indexed
    }

    pub fn from_sorted_keyed<const KM_WIDTH: usize>(
        km: &mut SortedKeyedMapping<N, KM_WIDTH>,
    ) -> Self {
        assert!(
            km.num_children() <= WIDTH,
            "cannot fit {} children into an indexed mapping of width {WIDTH}",
            km.num_children()
        );
        let mut im: IndexedMapping<N, WIDTH, Bitset> = IndexedMapping::new();
        km.move_into(&mut im);
        im
    }

    /// Moves the children, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        self.num_children = 0;
        for (key, pos) in self.child_ptr_indexes.iter() {
            if let Some(node) = self.children.erase(*pos as usize) {
                nm.add_child(key as u8, node);
            }
        }
        self.child_ptr_indexes.clear();
    }

    /// Slot in the child array that `key` points at, if mapped.
    pub fn slot_of(&self, key: u8) -> Option<usize> {
        self.child_ptr_indexes
            .get(key as usize)
            .map(|pos| *pos as usize)
    }

    #[inline]
    pub fn iter(&self) -> IndexedMappingIter<'_, N, WIDTH, Bitset> {
        IndexedMappingIter {
            mapping: self,
            cursor: 0,
        }
    }
}

/// Children in key order, following the index table.
pub struct IndexedMappingIter<'a, N, const WIDTH: usize, Bitset: BitsetTrait> {
    mapping: &'a IndexedMapping<N, WIDTH, Bitset>,
    cursor: usize,
}

impl<'a, N, const WIDTH: usize, Bitset: BitsetTrait> Iterator
    for IndexedMappingIter<'a, N, WIDTH, Bitset>
{
    type Item = (u8, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.mapping.child_ptr_indexes.next_used_pos(self.cursor)?;
        self.cursor = key + 1;
        let pos = self.mapping.child_ptr_indexes[key];
        Some((key as u8, &self.mapping.children[pos as usize]))
    }
}

impl<N, const WIDTH: usize, Bitset: BitsetTrait> NodeMapping<N, WIDTH>
    for IndexedMapping<N, WIDTH, Bitset>
{
    fn add_child(&mut self, key: u8, node: N) {
        assert!(
            !self.child_ptr_indexes.check(key as usize),
            "add_child: partial key {key:#04x} is already mapped"
        );
        let pos = self
            .children
            .first_free_pos()
            .expect("add_child: no space left");
        self.child_ptr_indexes.set(key as usize, pos as u8);
        self.children.set(pos, node);
        self.num_children += 1;
    }

    fn seek_child(&self, key: u8) -> Option<&N> {
        let pos = self.child_ptr_indexes.get(key as usize)?;
        self.children.get(*pos as usize)
    }

    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        let pos = self.child_ptr_indexes.get(key as usize)?;
        self.children.get_mut(*pos as usize)
    }

    fn delete_child(&mut self, key: u8) -> Option<N> {
        let pos = self.child_ptr_indexes.erase(key as usize)?;

        let old = self.children.erase(pos as usize);
        self.num_children -= 1;

        // Return what we deleted.
        old
    }

    fn num_children(&self) -> usize {
        self.num_children as usize
    }

    fn next_key(&self, key: u8) -> Option<u8> {
        self.child_ptr_indexes
            .next_used_pos(key as usize)
            .map(|k| k as u8)
    }

    fn prev_key(&self, key: u8) -> Option<u8> {
        self.child_ptr_indexes
            .prev_used_pos(key as usize)
            .map(|k| k as u8)
    }

    #[inline]
    fn width(&self) -> usize {
        WIDTH
    }
}

#[cfg(test)]
mod test {
    use crate::mapping::NodeMapping;
    use crate::utils::bitset::Bitset64;

    type Mapping48 = super::IndexedMapping<u8, 48, Bitset64<1>>;

    #[test]
    fn test_basic_mapping() {
        let mut mapping = Mapping48::new();
        for i in 0..48 {
            mapping.add_child(i, i);
            assert_eq!(*mapping.seek_child(i).unwrap(), i);
        }
        assert!(mapping.is_full());
        for i in 0..48 {
            assert_eq!(*mapping.seek_child(i).unwrap(), i);
        }
        for i in 0..48 {
            assert_eq!(mapping.delete_child(i).unwrap(), i);
        }
        for i in 0..48 {
            assert!(mapping.seek_child(i as u8).is_none());
        }
        assert_eq!(mapping.num_children(), 0);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut mapping = Mapping48::new();
        mapping.add_child(200, 1);
        mapping.add_child(100, 2);
        mapping.add_child(50, 3);
        assert_eq!(mapping.slot_of(200), Some(0));
        assert_eq!(mapping.slot_of(100), Some(1));

        mapping.delete_child(200);
        assert_eq!(mapping.slot_of(200), None);
        mapping.add_child(7, 4);
        assert_eq!(mapping.slot_of(7), Some(0));

        // Iteration follows key order, not slot order.
        let keys: Vec<u8> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![7, 50, 100]);
    }

    #[test]
    fn test_neighbour_keys() {
        let mut mapping = Mapping48::new();
        for k in [3u8, 64, 65, 250] {
            mapping.add_child(k, k);
        }
        assert_eq!(mapping.next_key(0), Some(3));
        assert_eq!(mapping.next_key(4), Some(64));
        assert_eq!(mapping.next_key(65), Some(65));
        assert_eq!(mapping.next_key(251), None);
        assert_eq!(mapping.prev_key(255), Some(250));
        assert_eq!(mapping.prev_key(63), Some(3));
        assert_eq!(mapping.prev_key(2), None);
    }

    #[test]
    #[should_panic(expected = "already mapped")]
    fn test_duplicate_key_panics() {
        let mut mapping = Mapping48::new();
        mapping.add_child(1, 1);
        mapping.add_child(1, 2);
    }
}
