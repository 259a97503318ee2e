use std::mem::MaybeUninit;
use std::ops::Index;

use crate::utils::bitset::BitsetTrait;

/// A fixed array of `RANGE_WIDTH` optional slots, with occupancy tracked in a bitset.
/// The bitset must have at least `RANGE_WIDTH` bits.
pub struct BitArray<X, const RANGE_WIDTH: usize, BitsetType>
where
    BitsetType: BitsetTrait,
{
    pub(crate) bitset: BitsetType,
    storage: [MaybeUninit<X>; RANGE_WIDTH],
}

impl<X, const RANGE_WIDTH: usize, BitsetType> BitArray<X, RANGE_WIDTH, BitsetType>
where
    BitsetType: BitsetTrait,
{
    pub fn new() -> Self {
        let bitset = BitsetType::default();
        assert!(bitset.capacity() >= RANGE_WIDTH);

        Self {
            bitset,
            storage: [const { MaybeUninit::uninit() }; RANGE_WIDTH],
        }
    }

    #[inline]
    pub fn first_free_pos(&self) -> Option<usize> {
        self.bitset.first_empty().filter(|pos| *pos < RANGE_WIDTH)
    }

    /// First occupied position at or above `from`.
    #[inline]
    pub fn next_used_pos(&self, from: usize) -> Option<usize> {
        self.bitset.next_set(from).filter(|pos| *pos < RANGE_WIDTH)
    }

    /// Last occupied position at or below `upto`.
    #[inline]
    pub fn prev_used_pos(&self, upto: usize) -> Option<usize> {
        self.bitset.prev_set(upto)
    }

    #[inline]
    pub fn check(&self, pos: usize) -> bool {
        pos < RANGE_WIDTH && self.bitset.check(pos)
    }

    #[inline]
    pub fn get(&self, pos: usize) -> Option<&X> {
        assert!(pos < RANGE_WIDTH);
        if self.bitset.check(pos) {
            Some(unsafe { self.storage[pos].assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut X> {
        assert!(pos < RANGE_WIDTH);
        if self.bitset.check(pos) {
            Some(unsafe { self.storage[pos].assume_init_mut() })
        } else {
            None
        }
    }

    /// Writes `x` into an unoccupied slot. Writing over an occupied slot would leak its value, so
    /// that is rejected; `erase` first.
    #[inline]
    pub fn set(&mut self, pos: usize, x: X) {
        assert!(pos < RANGE_WIDTH);
        assert!(!self.bitset.check(pos), "BitArray::set on occupied slot {pos}");
        self.storage[pos].write(x);
        self.bitset.set(pos);
    }

    #[inline]
    pub fn erase(&mut self, pos: usize) -> Option<X> {
        assert!(pos < RANGE_WIDTH);
        if !self.bitset.check(pos) {
            return None;
        }
        self.bitset.unset(pos);
        let old = std::mem::replace(&mut self.storage[pos], MaybeUninit::uninit());
        Some(unsafe { old.assume_init() })
    }

    pub fn clear(&mut self) {
        for i in 0..RANGE_WIDTH {
            if self.bitset.check(i) {
                unsafe { self.storage[i].assume_init_drop() }
            }
        }
        self.bitset.clear();
    }

    pub fn iter_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.bitset.iter().take_while(|pos| *pos < RANGE_WIDTH)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &X)> {
        self.iter_keys()
            .map(|pos| (pos, unsafe { self.storage[pos].assume_init_ref() }))
    }
}

impl<X, const RANGE_WIDTH: usize, BitsetType> Default for BitArray<X, RANGE_WIDTH, BitsetType>
where
    BitsetType: BitsetTrait,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<X, const RANGE_WIDTH: usize, BitsetType> Index<usize> for BitArray<X, RANGE_WIDTH, BitsetType>
where
    BitsetType: BitsetTrait,
{
    type Output = X;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("BitArray index on empty slot")
    }
}

impl<X, const RANGE_WIDTH: usize, BitsetType> Drop for BitArray<X, RANGE_WIDTH, BitsetType>
where
    BitsetType: BitsetTrait,
{
    fn drop(&mut self) {
        self.clear();
    }
}
