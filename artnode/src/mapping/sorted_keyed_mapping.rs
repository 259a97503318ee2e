use std::mem::MaybeUninit;

use crate::mapping::NodeMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::utils::bitset::BitsetTrait;
use crate::utils::u8_keys::{
    u8_keys_find_insert_position_sorted, u8_keys_find_key_position_sorted, u8_keys_next_sorted,
    u8_keys_prev_sorted,
};

/// Maps a key to a node, using a sorted array of keys and a corresponding array of nodes.
/// The first `num_children` positions are live; a key at a position means there is a node at the
/// same position in children.
/// Iteration and neighbour queries follow key order. Lookups use SIMD comparison where available.
/// When an item is inserted or deleted the items to the right of it are shifted by one slot.
/// A vacated trailing slot is left with key 0 and an uninitialized child.
pub struct SortedKeyedMapping<N, const WIDTH: usize> {
    pub(crate) keys: [u8; WIDTH],
    pub(crate) children: Box<[MaybeUninit<N>; WIDTH]>,
    pub(crate) num_children: u8,
}

impl<N, const WIDTH: usize> Default for SortedKeyedMapping<N, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize> SortedKeyedMapping<N, WIDTH> {
    #[inline]
    pub fn new() -> Self {
        Self {
            keys: [0; WIDTH],
            children: Box::new([const { MaybeUninit::uninit() }; WIDTH]),
            num_children: 0,
        }
    }

    /// Moves every child of `km` into a new mapping of a different width, keeping order.
    /// `km` is left empty.
    pub fn from_resized<const OLD_WIDTH: usize>(km: &mut SortedKeyedMapping<N, OLD_WIDTH>) -> Self {
        assert!(
            km.num_children() <= WIDTH,
            "cannot fit {} children into a mapping of width {WIDTH}",
            km.num_children()
        );
        let mut new = SortedKeyedMapping::new();
        km.move_into(&mut new);
        new
    }

    pub(crate) fn from_indexed<const IDX_WIDTH: usize, FromBitset: BitsetTrait>(
        im: &mut IndexedMapping<N, IDX_WIDTH, FromBitset>,
    ) -> Self {
        assert!(
            im.num_children() <= WIDTH,
            "cannot fit {} children into a mapping of width {WIDTH}",
            im.num_children()
        );
        let mut new_mapping = SortedKeyedMapping::new();
        im.move_into(&mut new_mapping);
        new_mapping
    }

    /// Moves the children, in ascending key order, into `nm`.
    pub(crate) fn move_into<const NM_WIDTH: usize, NM: NodeMapping<N, NM_WIDTH>>(
        &mut self,
        nm: &mut NM,
    ) {
        let num_children = self.num_children as usize;
        self.num_children = 0;
        for i in 0..num_children {
            let child = std::mem::replace(&mut self.children[i], MaybeUninit::uninit());
            nm.add_child(self.keys[i], unsafe { child.assume_init() });
            self.keys[i] = 0;
        }
    }

    /// Removes and returns the only child.
    pub fn take_sole_child(&mut self) -> Option<(u8, N)> {
        if self.num_children != 1 {
            return None;
        }
        let key = self.keys[0];
        self.delete_child(key).map(|child| (key, child))
    }

    /// The live keys, in ascending order.
    #[inline]
    pub fn keys(&self) -> &[u8] {
        &self.keys[..self.num_children as usize]
    }

    /// The whole key array, including vacated slots.
    #[inline]
    pub fn raw_keys(&self) -> &[u8; WIDTH] {
        &self.keys
    }

    #[inline]
    pub fn iter(&self) -> SortedKeyedMappingIter<'_, N, WIDTH> {
        SortedKeyedMappingIter {
            mapping: self,
            idx: 0,
        }
    }
}

pub struct SortedKeyedMappingIter<'a, N, const WIDTH: usize> {
    mapping: &'a SortedKeyedMapping<N, WIDTH>,
    idx: usize,
}

impl<'a, N, const WIDTH: usize> Iterator for SortedKeyedMappingIter<'a, N, WIDTH> {
    type Item = (u8, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.mapping.num_children as usize {
            return None;
        }
        let i = self.idx;
        self.idx += 1;
        Some((self.mapping.keys[i], unsafe {
            self.mapping.children[i].assume_init_ref()
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.mapping.num_children as usize - self.idx;
        (remaining, Some(remaining))
    }
}

impl<N, const WIDTH: usize> NodeMapping<N, WIDTH> for SortedKeyedMapping<N, WIDTH> {
    #[inline]
    fn add_child(&mut self, key: u8, node: N) {
        let num_children = self.num_children as usize;
        assert!(num_children < WIDTH, "add_child: no space left");

        // Locate the slot before touching anything, so a duplicate key panics with the mapping
        // intact.
        let idx = match u8_keys_find_insert_position_sorted(key, &self.keys, num_children) {
            Ok(idx) => idx,
            Err(_) => panic!("add_child: partial key {key:#04x} is already mapped"),
        };

        // Shift larger keys one slot to the right.
        for i in (idx..num_children).rev() {
            self.keys[i + 1] = self.keys[i];
            self.children[i + 1] = std::mem::replace(&mut self.children[i], MaybeUninit::uninit());
        }
        self.keys[idx] = key;
        self.children[idx].write(node);
        self.num_children += 1;
    }

    fn seek_child(&self, key: u8) -> Option<&N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        Some(unsafe { self.children[idx].assume_init_ref() })
    }

    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        Some(unsafe { self.children[idx].assume_init_mut() })
    }

    fn delete_child(&mut self, key: u8) -> Option<N> {
        let num_children = self.num_children as usize;
        let idx = u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, num_children)?;

        // Remove the value.
        let node = std::mem::replace(&mut self.children[idx], MaybeUninit::uninit());

        // Shift keys and children to the left.
        for i in idx..num_children - 1 {
            self.keys[i] = self.keys[i + 1];
            self.children[i] = std::mem::replace(&mut self.children[i + 1], MaybeUninit::uninit());
        }

        // The trailing slot is vacated.
        self.keys[num_children - 1] = 0;
        self.num_children -= 1;

        Some(unsafe { node.assume_init() })
    }

    #[inline(always)]
    fn num_children(&self) -> usize {
        self.num_children as usize
    }

    fn next_key(&self, key: u8) -> Option<u8> {
        u8_keys_next_sorted(key, &self.keys, self.num_children as usize)
    }

    fn prev_key(&self, key: u8) -> Option<u8> {
        u8_keys_prev_sorted(key, &self.keys, self.num_children as usize)
    }
}

impl<N, const WIDTH: usize> Drop for SortedKeyedMapping<N, WIDTH> {
    fn drop(&mut self) {
        for value in &mut self.children[..self.num_children as usize] {
            unsafe { value.assume_init_drop() }
        }
        self.num_children = 0;
    }
}
