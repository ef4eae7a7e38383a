//! Decode errors.

/// Errors raised while decoding an ECT blob.
///
/// Every variant except [`EctError::UnknownBlockName`] aborts the whole decode:
/// no block of a failed decode is ever published.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EctError {
    /// The blob does not start with the `PARA` marker.
    #[error("bad ECT signature {found:02x?}")]
    BadSignature { found: [u8; 4] },

    /// A read of `len` bytes at `offset` does not fit into the table.
    #[error("read of {len} bytes at offset {offset:#x} runs past the end of the table")]
    TruncatedBuffer { offset: usize, len: usize },

    /// A record list could not be allocated.
    #[error("out of memory while building a record list")]
    AllocationFailure,

    /// A directory entry names a block no decoder is registered for.
    #[error("no decoder registered for this block name")]
    UnknownBlockName,

    /// A length-prefixed string is not valid UTF-8 up to its terminator.
    #[error("malformed string at offset {offset:#x}")]
    InvalidString { offset: usize },

    /// A mode selector holds a value this decoder does not know.
    #[error("unsupported mode {mode} at offset {offset:#x}")]
    UnsupportedMode { offset: usize, mode: u32 },
}

impl From<alloc::collections::TryReserveError> for EctError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        Self::AllocationFailure
    }
}
