//! Zero-copy views over arrays stored in place inside the blob.
//!
//! The blob gives no alignment guarantee past a byte-sized array (compact
//! voltage steps are followed directly by the next table), so the views keep
//! raw bytes and assemble each word with [`u32::from_le_bytes`] on access.
//! The length of every view was validated when it was taken from the cursor.

use core::fmt;
use core::marker::PhantomData;

#[inline]
fn word_at(bytes: &[u8], index: usize) -> Option<u32> {
    let start = index.checked_mul(4)?;
    let s = bytes.get(start..start.checked_add(4)?)?;
    Some(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

/// A borrowed array of 32-bit words.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Words<'a> {
    bytes: &'a [u8],
}

impl<'a> Words<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of words.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len() / 4
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Word at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        word_at(self.bytes, index)
    }

    /// Word at `index`, reinterpreted as signed.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn get_i32(&self, index: usize) -> Option<i32> {
        self.get(index).map(|w| w as i32)
    }

    /// 64-bit value of logical `cell`, stored as words `2 * cell` (low) and
    /// `2 * cell + 1` (high).
    #[must_use]
    pub fn get_u64_pair(&self, cell: usize) -> Option<u64> {
        let index = cell.checked_mul(2)?;
        let low = self.get(index)?;
        let high = self.get(index + 1)?;
        Some((u64::from(high) << 32) | u64::from(low))
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + 'a {
        let bytes = self.bytes;
        (0..self.len()).filter_map(move |i| word_at(bytes, i))
    }

    /// The underlying bytes, as stored in the blob.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl fmt::Debug for Words<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A fixed-size record stored in place as consecutive words.
pub trait Packed: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decode one record from exactly [`Packed::SIZE`] bytes.
    fn unpack(bytes: &[u8]) -> Self;
}

/// Word `index` of a record slice handed to [`Packed::unpack`].
///
/// # Panics
/// If the slice is shorter than `4 * (index + 1)` bytes; [`Records`] never
/// passes such a slice.
#[inline]
#[must_use]
pub fn field(bytes: &[u8], index: usize) -> u32 {
    let s = &bytes[index * 4..index * 4 + 4];
    u32::from_le_bytes([s[0], s[1], s[2], s[3]])
}

/// A borrowed array of [`Packed`] records.
pub struct Records<'a, T> {
    bytes: &'a [u8],
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Packed> Records<'a, T> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len() / T::SIZE
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(T::SIZE)?;
        let end = start.checked_add(T::SIZE)?;
        self.bytes.get(start..end).map(T::unpack)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> {
        self.bytes.chunks_exact(T::SIZE).map(T::unpack)
    }
}

impl<T> Clone for Records<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Records<'_, T> {}

impl<T: Packed + fmt::Debug> fmt::Debug for Records<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Pair(u32, u32);

    impl Packed for Pair {
        const SIZE: usize = 8;

        fn unpack(bytes: &[u8]) -> Self {
            Self(field(bytes, 0), field(bytes, 1))
        }
    }

    fn le(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn words_survive_unaligned_storage() {
        let mut bytes = vec![0xAA];
        bytes.extend(le(&[7, 0xFFFF_FFFF]));
        let words = Words::new(&bytes[1..]);
        assert_eq!(words.len(), 2);
        assert_eq!(words.get(0), Some(7));
        assert_eq!(words.get_i32(1), Some(-1));
        assert_eq!(words.get(2), None);
        assert_eq!(words.iter().collect::<Vec<_>>(), vec![7, u32::MAX]);
    }

    #[test]
    fn u64_pairs_are_addressed_by_cell() {
        let bytes = le(&[1, 0, 0x89AB_CDEF, 0x0123_4567]);
        let words = Words::new(&bytes);
        assert_eq!(words.get_u64_pair(0), Some(1));
        assert_eq!(words.get_u64_pair(1), Some(0x0123_4567_89AB_CDEF));
        assert_eq!(words.get_u64_pair(2), None);
    }

    #[test]
    fn records_unpack_on_access() {
        let bytes = le(&[1, 2, 3, 4]);
        let records = Records::<Pair>::new(&bytes);
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(1), Some(Pair(3, 4)));
        assert_eq!(records.get(2), None);
        assert_eq!(records.iter().count(), 2);
    }
}
