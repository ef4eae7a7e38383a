//! # Primitive Readers
//!
//! A [`Cursor`] walks a borrowed blob front to back. Every read is bounds
//! checked against the blob (which the decoder has already truncated to the
//! header's `total_size`), so a malformed offset or count surfaces as
//! [`EctError::TruncatedBuffer`] instead of an out-of-range access.
//!
//! All integers are 32-bit little-endian words. Strings are stored as a word
//! holding `strlen`, followed by the bytes and their NUL terminator, padded to
//! the next 4-byte boundary.

use crate::array::{Packed, Records, Words};
use crate::error::EctError;

/// Padding granularity of strings in the blob.
pub const ALIGNMENT: usize = 4;

/// Round `len` up to the string padding granularity, or `None` on overflow.
#[inline]
#[must_use]
pub const fn align4(len: usize) -> Option<usize> {
    match len.checked_add(ALIGNMENT - 1) {
        Some(end) => Some(end & !(ALIGNMENT - 1)),
        None => None,
    }
}

/// Read-only position within a blob.
#[derive(Debug, Copy, Clone)]
pub struct Cursor<'a> {
    blob: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `blob`.
    #[must_use]
    pub const fn new(blob: &'a [u8]) -> Self {
        Self { blob, pos: 0 }
    }

    /// Cursor at byte `offset` of `blob`.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if `offset` lies outside the blob.
    pub fn at(blob: &'a [u8], offset: usize) -> Result<Self, EctError> {
        if offset >= blob.len() {
            return Err(EctError::TruncatedBuffer { offset, len: 0 });
        }
        Ok(Self { blob, pos: offset })
    }

    /// Current byte offset from the blob origin.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the blob.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.blob.len() - self.pos
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if fewer than `len` bytes remain.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], EctError> {
        let truncated = EctError::TruncatedBuffer {
            offset: self.pos,
            len,
        };
        let end = self.pos.checked_add(len).ok_or(truncated)?;
        let bytes = self.blob.get(self.pos..end).ok_or(truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Read one 32-bit word.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, EctError> {
        let s = self.take(4)?;
        Ok(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
    }

    /// Read a 4-byte tag (signature or version) verbatim.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if fewer than 4 bytes remain.
    pub fn read_tag(&mut self) -> Result<[u8; 4], EctError> {
        let s = self.take(4)?;
        Ok([s[0], s[1], s[2], s[3]])
    }

    /// Read a 64-bit value stored as two words, low word first.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if fewer than 8 bytes remain.
    pub fn read_u64_pair(&mut self) -> Result<u64, EctError> {
        let low = self.read_u32()?;
        let high = self.read_u32()?;
        Ok((u64::from(high) << 32) | u64::from(low))
    }

    /// Read a length-prefixed string.
    ///
    /// The returned slice covers the stored length plus the terminator; the
    /// cursor moves past the padding that follows it.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if the padded string does not fit.
    pub fn read_string(&mut self) -> Result<&'a [u8], EctError> {
        let start = self.pos;
        let overflow = EctError::TruncatedBuffer {
            offset: start,
            len: usize::MAX,
        };
        let len = usize::try_from(self.read_u32()?)
            .ok()
            .and_then(|l| l.checked_add(1))
            .ok_or(overflow)?;
        let padded = self.take(align4(len).ok_or(overflow)?)?;
        Ok(&padded[..len])
    }

    /// Read a length-prefixed string and view it as `str`, cut at the first NUL.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] as for [`Cursor::read_string`], and
    /// [`EctError::InvalidString`] if the bytes are not UTF-8.
    pub fn read_name(&mut self) -> Result<&'a str, EctError> {
        let offset = self.pos;
        let raw = self.read_string()?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        core::str::from_utf8(&raw[..end]).map_err(|_| EctError::InvalidString { offset })
    }

    /// Borrow `count` consecutive words.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if they do not fit.
    pub fn read_words(&mut self, count: usize) -> Result<Words<'a>, EctError> {
        let len = count.checked_mul(4).ok_or(EctError::TruncatedBuffer {
            offset: self.pos,
            len: usize::MAX,
        })?;
        Ok(Words::new(self.take(len)?))
    }

    /// Borrow `count` fixed-size records of type `T`.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if they do not fit.
    pub fn read_records<T: Packed>(&mut self, count: usize) -> Result<Records<'a, T>, EctError> {
        let len = count.checked_mul(T::SIZE).ok_or(EctError::TruncatedBuffer {
            offset: self.pos,
            len: usize::MAX,
        })?;
        Ok(Records::new(self.take(len)?))
    }

    /// Check that `count` items of at least `item_size` bytes each could still
    /// follow, before sizing an allocation after an untrusted count.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if they cannot.
    pub fn ensure(&self, count: usize, item_size: usize) -> Result<(), EctError> {
        match count.checked_mul(item_size) {
            Some(len) if len <= self.remaining() => Ok(()),
            _ => Err(EctError::TruncatedBuffer {
                offset: self.pos,
                len: count.saturating_mul(item_size),
            }),
        }
    }
}

/// Number of cells in a `rows × cols` matrix.
///
/// # Errors
/// [`EctError::TruncatedBuffer`] if the product overflows; no blob can hold it.
pub fn cells(rows: u32, cols: u32, offset: usize) -> Result<usize, EctError> {
    usize::try_from(u64::from(rows) * u64::from(cols)).map_err(|_| EctError::TruncatedBuffer {
        offset,
        len: usize::MAX,
    })
}

/// Widen a count read from the blob.
///
/// # Errors
/// [`EctError::TruncatedBuffer`] on targets where it does not fit `usize`.
pub fn count(value: u32, offset: usize) -> Result<usize, EctError> {
    usize::try_from(value).map_err(|_| EctError::TruncatedBuffer {
        offset,
        len: usize::MAX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_string(s: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&u32::try_from(s.len()).unwrap().to_le_bytes());
        out.extend_from_slice(s.as_bytes());
        out.push(0);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }

    #[test]
    fn reads_words_little_endian() {
        let blob = [0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut c = Cursor::new(&blob);
        assert_eq!(c.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(c.read_u32().unwrap(), u32::MAX);
        assert_eq!(c.position(), 8);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn u64_pair_is_low_word_first() {
        let mut blob = Vec::new();
        blob.extend_from_slice(&0xDEAD_BEEF_u32.to_le_bytes());
        blob.extend_from_slice(&0x0000_0001_u32.to_le_bytes());
        let mut c = Cursor::new(&blob);
        assert_eq!(c.read_u64_pair().unwrap(), 0x0000_0001_DEAD_BEEF);
        assert_eq!(c.position(), 8);
    }

    #[test]
    fn string_advances_by_padded_length() {
        for (name, advance) in [("", 8), ("A", 8), ("ABC", 8), ("ABCD", 12), ("CPU_PLL", 12)] {
            let blob = encode_string(name);
            let mut c = Cursor::new(&blob);
            let raw = c.read_string().unwrap();
            assert_eq!(raw.len(), name.len() + 1);
            assert_eq!(&raw[..name.len()], name.as_bytes());
            assert_eq!(Some(c.position()), align4(name.len() + 1).map(|n| n + 4));
            assert_eq!(c.position(), advance, "{name}");
        }
    }

    #[test]
    fn name_is_cut_at_terminator() {
        let blob = encode_string("DVFS");
        assert_eq!(Cursor::new(&blob).read_name().unwrap(), "DVFS");
    }

    #[test]
    fn name_rejects_invalid_utf8() {
        let blob = [2, 0, 0, 0, 0xC3, 0x28, 0, 0];
        assert_eq!(
            Cursor::new(&blob).read_name(),
            Err(EctError::InvalidString { offset: 0 })
        );
    }

    #[test]
    fn short_reads_are_truncation_errors() {
        let blob = [1, 2, 3];
        assert_eq!(
            Cursor::new(&blob).read_u32(),
            Err(EctError::TruncatedBuffer { offset: 0, len: 4 })
        );

        // Length claims 8 bytes (+ terminator), only 4 follow.
        let blob = [8, 0, 0, 0, b'A', b'B', b'C', 0];
        assert!(matches!(
            Cursor::new(&blob).read_string(),
            Err(EctError::TruncatedBuffer { offset: 4, len: 12 })
        ));
    }

    #[test]
    fn huge_string_length_does_not_overflow() {
        let blob = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        assert!(matches!(
            Cursor::new(&blob).read_string(),
            Err(EctError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn padding_overflow_is_none() {
        assert_eq!(align4(0), Some(0));
        assert_eq!(align4(5), Some(8));
        assert_eq!(align4(usize::MAX - 3), Some(usize::MAX - 3));
        assert_eq!(align4(usize::MAX - 1), None);
        assert_eq!(align4(usize::MAX), None);
    }

    #[test]
    fn cursor_offset_must_be_inside_blob() {
        let blob = [0u8; 8];
        assert!(Cursor::at(&blob, 4).is_ok());
        assert_eq!(
            Cursor::at(&blob, 8).unwrap_err(),
            EctError::TruncatedBuffer { offset: 8, len: 0 }
        );
    }

    #[test]
    fn ensure_checks_remaining_space() {
        let blob = [0u8; 24];
        let c = Cursor::new(&blob);
        assert!(c.ensure(2, 12).is_ok());
        assert!(c.ensure(3, 12).is_err());
        assert!(c.ensure(usize::MAX, 12).is_err());
    }
}
