//! # Block Directory
//!
//! The blob opens with a fixed header followed by the directory:
//!
//! ```text
//! +0   sign         "PARA"
//! +4   version      4 ASCII bytes, e.g. "0001"
//! +8   total_size   u32, size of the whole blob in bytes
//! +12  num_of_header u32, number of directory entries
//! +16  num_of_header × { name: padded string, offset: u32 }
//! ```
//!
//! Each directory offset is relative to the blob origin and points at the
//! start of a named block.

use crate::cursor::{self, Cursor};
use crate::error::EctError;

/// Signature every ECT blob starts with.
pub const SIGNATURE: [u8; 4] = *b"PARA";

/// Size of the fixed part of the header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Smallest encoded directory entry: an empty string and an offset.
const MIN_ENTRY_SIZE: usize = 12;

/// The fixed blob header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EctHeader {
    pub sign: [u8; 4],
    pub version: [u8; 4],
    pub total_size: u32,
    pub num_of_header: u32,
}

impl EctHeader {
    /// Read the header at the cursor and validate its signature.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if the blob is shorter than the header,
    /// [`EctError::BadSignature`] if it does not start with [`SIGNATURE`].
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self, EctError> {
        let header = Self {
            sign: cursor.read_tag()?,
            version: cursor.read_tag()?,
            total_size: cursor.read_u32()?,
            num_of_header: cursor.read_u32()?,
        };

        if header.sign != SIGNATURE {
            return Err(EctError::BadSignature { found: header.sign });
        }

        Ok(header)
    }

    /// The version tag as text; non-ASCII bytes show as `?`.
    #[must_use]
    pub fn version_str(&self) -> VersionTag {
        VersionTag(self.version)
    }
}

/// Displays a 4-byte version tag such as `0001`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VersionTag(pub [u8; 4]);

impl core::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '?'
            };
            core::fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// One `(name, offset)` pair of the directory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectoryEntry<'a> {
    pub name: &'a str,
    pub offset: usize,
}

/// The directory following the header.
pub struct Directory<'a> {
    cursor: Cursor<'a>,
    count: usize,
}

impl<'a> Directory<'a> {
    /// Position the directory right after `header`.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] if the declared entries cannot fit.
    pub fn new(cursor: Cursor<'a>, header: &EctHeader) -> Result<Self, EctError> {
        let count = cursor::count(header.num_of_header, cursor.position())?;
        cursor.ensure(count, MIN_ENTRY_SIZE)?;
        Ok(Self { cursor, count })
    }

    /// Number of entries still to be read.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<'a> Iterator for Directory<'a> {
    type Item = Result<DirectoryEntry<'a>, EctError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;

        let entry = self.cursor.read_name().and_then(|name| {
            let at = self.cursor.position();
            let offset = cursor::count(self.cursor.read_u32()?, at)?;
            Ok(DirectoryEntry { name, offset })
        });

        // A broken entry ends the walk.
        if entry.is_err() {
            self.count = 0;
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count))
    }
}

impl core::iter::FusedIterator for Directory<'_> {}
