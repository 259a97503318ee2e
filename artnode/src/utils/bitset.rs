use num_traits::PrimInt;

pub trait BitsetTrait: Default {
    fn first_empty(&self) -> Option<usize>;
    fn set(&mut self, pos: usize);
    fn unset(&mut self, pos: usize);
    fn check(&self, pos: usize) -> bool;
    fn clear(&mut self);
    fn capacity(&self) -> usize;
    /// Position of the lowest set bit at or above `from`.
    fn next_set(&self, from: usize) -> Option<usize>;
    /// Position of the highest set bit at or below `upto`.
    fn prev_set(&self, upto: usize) -> Option<usize>;

    /// Set bit positions in ascending order.
    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.next_set(0);
        std::iter::from_fn(move || {
            let cur = next?;
            next = self.next_set(cur + 1);
            Some(cur)
        })
    }
}

// TODO: The bulk of these parameters can be deleted and automatically derived when
// generic_const_exprs lands in stable.
pub struct Bitset<
    StorageType,
    const BIT_WIDTH: usize,
    const SHIFT: usize,
    const STORAGE_WIDTH: usize,
> where
    StorageType: PrimInt,
{
    bitset: [StorageType; STORAGE_WIDTH],
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize>
    Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    pub fn new() -> Self {
        Self {
            bitset: [StorageType::zero(); STORAGE_WIDTH],
        }
    }
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize>
    BitsetTrait for Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    fn first_empty(&self) -> Option<usize> {
        for (i, b) in self.bitset.iter().enumerate() {
            if b.is_zero() {
                return Some(i << SHIFT);
            }
            if *b != StorageType::max_value() {
                return Some((i << SHIFT) + b.trailing_ones() as usize);
            }
        }
        None
    }

    #[inline]
    fn set(&mut self, pos: usize) {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let v = self.bitset[pos >> SHIFT];
        let shift: StorageType = StorageType::one() << (pos % BIT_WIDTH);
        self.bitset[pos >> SHIFT] = v | shift;
    }

    #[inline]
    fn unset(&mut self, pos: usize) {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let v = self.bitset[pos >> SHIFT];
        let shift: StorageType = StorageType::one() << (pos % BIT_WIDTH);
        self.bitset[pos >> SHIFT] = v & !shift;
    }

    #[inline]
    fn check(&self, pos: usize) -> bool {
        assert!(pos < STORAGE_WIDTH * BIT_WIDTH);
        let shift: StorageType = StorageType::one() << (pos % BIT_WIDTH);
        !(self.bitset[pos >> SHIFT] & shift).is_zero()
    }

    #[inline]
    fn clear(&mut self) {
        self.bitset.fill(StorageType::zero());
    }

    fn capacity(&self) -> usize {
        STORAGE_WIDTH * BIT_WIDTH
    }

    fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.capacity() {
            return None;
        }
        let mut word = from >> SHIFT;
        let mut masked = self.bitset[word] & (StorageType::max_value() << (from % BIT_WIDTH));
        loop {
            if !masked.is_zero() {
                return Some((word << SHIFT) + masked.trailing_zeros() as usize);
            }
            word += 1;
            if word >= STORAGE_WIDTH {
                return None;
            }
            masked = self.bitset[word];
        }
    }

    fn prev_set(&self, upto: usize) -> Option<usize> {
        let upto = upto.min(self.capacity().checked_sub(1)?);
        let mut word = upto >> SHIFT;
        // Keep bits 0..=upto within the first word examined.
        let keep = StorageType::max_value() >> (BIT_WIDTH - 1 - upto % BIT_WIDTH);
        let mut masked = self.bitset[word] & keep;
        loop {
            if !masked.is_zero() {
                return Some((word << SHIFT) + BIT_WIDTH - 1 - masked.leading_zeros() as usize);
            }
            if word == 0 {
                return None;
            }
            word -= 1;
            masked = self.bitset[word];
        }
    }
}

impl<StorageType, const BIT_WIDTH: usize, const SHIFT: usize, const STORAGE_WIDTH: usize> Default
    for Bitset<StorageType, BIT_WIDTH, SHIFT, STORAGE_WIDTH>
where
    StorageType: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

pub type Bitset64<const STORAGE_WIDTH_U64: usize> = Bitset<u64, 64, 6, STORAGE_WIDTH_U64>;
pub type Bitset32<const STORAGE_WIDTH_U32: usize> = Bitset<u32, 32, 5, STORAGE_WIDTH_U32>;
pub type Bitset16<const STORAGE_WIDTH_U16: usize> = Bitset<u16, 16, 4, STORAGE_WIDTH_U16>;
pub type Bitset8<const STORAGE_WIDTH_U8: usize> = Bitset<u8, 8, 3, STORAGE_WIDTH_U8>;
