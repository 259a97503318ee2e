use crate::mapping::NodeMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::utils::bitarray::BitArray;
use crate::utils::bitset::{Bitset64, BitsetTrait};

/// One slot per possible key byte. Presence is a bit in the occupancy bitset.
pub struct DirectMapping<N> {
    pub(crate) children: Box<BitArray<N, 256, Bitset64<4>>>,
    num_children: usize,
}

impl<N> Default for DirectMapping<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DirectMapping<N> {
    pub fn new() -> Self {
        Self {
            children: Box::new(BitArray::new()),
            num_children: 0,
        }
    }

    pub fn from_indexed<const WIDTH: usize, FromBitset: BitsetTrait>(
        im: &mut IndexedMapping<N, WIDTH, FromBitset>,
    ) -> Self {
        let mut new_mapping = DirectMapping::<N>::new();
        im.move_into(&mut new_mapping);
        new_mapping
    }

    /// Moves the children, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        self.num_children = 0;
        let mut next = self.children.next_used_pos(0);
        while let Some(key) = next {
            if let Some(child) = self.children.erase(key) {
                nm.add_child(key as u8, child);
            }
            next = self.children.next_used_pos(key + 1);
        }
    }

    #[inline]
    pub fn iter(&self) -> DirectMappingIter<'_, N> {
        DirectMappingIter {
            children: &self.children,
            cursor: 0,
        }
    }
}

pub struct DirectMappingIter<'a, N> {
    children: &'a BitArray<N, 256, Bitset64<4>>,
    cursor: usize,
}

impl<'a, N> Iterator for DirectMappingIter<'a, N> {
    type Item = (u8, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.children.next_used_pos(self.cursor)?;
        self.cursor = key + 1;
        Some((key as u8, &self.children[key]))
    }
}

impl<N> NodeMapping<N, 256> for DirectMapping<N> {
    #[inline]
    fn add_child(&mut self, key: u8, node: N) {
        assert!(
            !self.children.check(key as usize),
            "add_child: partial key {key:#04x} is already mapped"
        );
        self.children.set(key as usize, node);
        self.num_children += 1;
    }

    #[inline]
    fn seek_child(&self, key: u8) -> Option<&N> {
        self.children.get(key as usize)
    }

    #[inline]
    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        self.children.get_mut(key as usize)
    }

    #[inline]
    fn delete_child(&mut self, key: u8) -> Option<N> {
        let n = self.children.erase(key as usize);
        if n.is_some() {
            self.num_children -= 1;
        }
        n
    }

    #[inline]
    fn num_children(&self) -> usize {
        self.num_children
    }

    fn next_key(&self, key: u8) -> Option<u8> {
        self.children.next_used_pos(key as usize).map(|k| k as u8)
    }

    fn prev_key(&self, key: u8) -> Option<u8> {
        self.children.prev_used_pos(key as usize).map(|k| k as u8)
    }
}
