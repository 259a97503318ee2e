use std::fmt;

use crate::partials::Partial;

/// A prefix stored inline in `SIZE` bytes.
///
/// `stored` counts the bytes held in `data`, which are always the leading bytes of the prefix;
/// `len` is the logical length. Prefixes longer than what is held keep their full logical length,
/// so a node can report a prefix length beyond what it stores. Recovering the missing bytes (e.g.
/// from a leaf below) is the owning tree's business.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrPartial<const SIZE: usize> {
    data: [u8; SIZE],
    stored: usize,
    len: usize,
}

impl<const SIZE: usize> ArrPartial<SIZE> {
    pub fn key(src: &[u8]) -> Self {
        Self::from_slice(src)
    }

    /// True if the logical prefix is longer than what is held inline.
    pub fn is_truncated(&self) -> bool {
        self.stored < self.len
    }
}

impl<const SIZE: usize> Default for ArrPartial<SIZE> {
    fn default() -> Self {
        Self {
            data: [0; SIZE],
            stored: 0,
            len: 0,
        }
    }
}

impl<const SIZE: usize> fmt::Debug for ArrPartial<SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrPartial")
            .field("stored", &self.as_ref())
            .field("len", &self.len)
            .finish()
    }
}

impl<const SIZE: usize> AsRef<[u8]> for ArrPartial<SIZE> {
    fn as_ref(&self) -> &[u8] {
        &self.data[..self.stored]
    }
}

impl<const SIZE: usize> From<&[u8]> for ArrPartial<SIZE> {
    fn from(src: &[u8]) -> Self {
        Self::from_slice(src)
    }
}

impl<const SIZE: usize> Partial for ArrPartial<SIZE> {
    fn from_slice(src: &[u8]) -> Self {
        let mut data = [0; SIZE];
        let stored = src.len().min(SIZE);
        data[..stored].copy_from_slice(&src[..stored]);
        Self {
            data,
            stored,
            len: src.len(),
        }
    }

    fn partial_before(&self, length: usize) -> Self {
        assert!(length <= self.len);
        let mut data = [0; SIZE];
        let stored = length.min(self.stored);
        data[..stored].copy_from_slice(&self.data[..stored]);
        Self {
            data,
            stored,
            len: length,
        }
    }

    fn partial_after(&self, start: usize) -> Self {
        assert!(start <= self.len);
        let mut data = [0; SIZE];
        let stored = self.stored.saturating_sub(start);
        if stored > 0 {
            data[..stored].copy_from_slice(&self.data[start..start + stored]);
        }
        Self {
            data,
            stored,
            len: self.len - start,
        }
    }

    fn partial_extended_with(&self, other: &Self) -> Self {
        let mut data = self.data;
        let mut stored = self.stored;
        // Bytes of `other` only follow on inline if all of `self` is held.
        if !self.is_truncated() {
            let copied = other.stored.min(SIZE - self.stored);
            data[stored..stored + copied].copy_from_slice(&other.data[..copied]);
            stored += copied;
        }
        Self {
            data,
            stored,
            len: self.len + other.len,
        }
    }

    #[inline(always)]
    fn at(&self, pos: usize) -> u8 {
        assert!(pos < self.stored);
        self.data[pos]
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}
