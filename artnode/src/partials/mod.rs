//! Path-compressed node prefixes.

pub mod array_partial;
pub mod vector_partial;

/// The compressed run of key bytes held by a node.
///
/// `len()` is the logical length of the prefix. An implementation may keep fewer bytes than
/// that (see [`array_partial::ArrPartial`]); the stored bytes, returned by `as_ref()`, are always
/// the leading bytes of the logical prefix.
pub trait Partial: AsRef<[u8]> + Clone + Default {
    /// Builds a partial holding `src`.
    fn from_slice(src: &[u8]) -> Self;
    /// Returns a partial of the first `length` logical bytes.
    fn partial_before(&self, length: usize) -> Self;
    /// Returns a partial from `start` onwards.
    fn partial_after(&self, start: usize) -> Self;
    /// Extends the partial with another partial.
    fn partial_extended_with(&self, other: &Self) -> Self;
    /// Returns the stored byte at `pos`.
    fn at(&self, pos: usize) -> u8;
    /// Returns the logical length of the partial.
    fn len(&self) -> usize;
    /// Number of bytes actually held.
    fn stored_len(&self) -> usize {
        self.as_ref().len()
    }
    /// True if every logical byte is held.
    fn is_complete(&self) -> bool {
        self.stored_len() == self.len()
    }
    /// Returns the length of the common prefix between the stored bytes of `self` and `slice`.
    fn prefix_length_slice(&self, slice: &[u8]) -> usize {
        self.as_ref()
            .iter()
            .zip(slice)
            .take_while(|(a, b)| a == b)
            .count()
    }
}
