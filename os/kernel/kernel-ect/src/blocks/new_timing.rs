//! New timing-parameter block: memory timing matrices keyed by a 64-bit
//! parameter key rather than by name.
//!
//! Table entries are `{ key: u64 (low word first), offset: u32 }`. Each body
//! is `{ mode, num_of_timing_param, num_of_level }` followed by a
//! `num_of_level × num_of_timing_param` matrix. In extended mode every cell
//! spans two words, low word first.

use crate::array::Words;
use crate::blocks::{BlockTable, Record};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type NewTimingParamBlock<'a> = BlockTable<TimingParamSize<'a>>;

/// Width of the cells of a timing matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimingMode {
    /// One word per cell.
    Normal,
    /// Two words per cell.
    Extended,
}

impl TimingMode {
    /// Mode for the selector stored in the blob.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Normal),
            1 => Some(Self::Extended),
            _ => None,
        }
    }

    /// Words per cell.
    #[must_use]
    pub const fn words_per_cell(self) -> usize {
        match self {
            Self::Normal => 1,
            Self::Extended => 2,
        }
    }
}

#[derive(Debug)]
pub struct TimingParamSize<'a> {
    pub parameter_key: u64,
    pub mode: TimingMode,
    pub num_of_timing_param: u32,
    pub num_of_level: u32,
    /// Raw matrix words; see [`TimingParamSize::value`].
    pub timing_parameter: Words<'a>,
}

impl TimingParamSize<'_> {
    /// Value of parameter `param` at `level`, widened to 64 bits.
    #[must_use]
    pub fn value(&self, level: usize, param: usize) -> Option<u64> {
        let params = usize::try_from(self.num_of_timing_param).ok()?;
        if param >= params {
            return None;
        }
        let cell = level.checked_mul(params)?.checked_add(param)?;
        match self.mode {
            TimingMode::Normal => self.timing_parameter.get(cell).map(u64::from),
            TimingMode::Extended => self.timing_parameter.get_u64_pair(cell),
        }
    }
}

impl<'a> Record<'a> for TimingParamSize<'a> {
    type Key = u64;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<u64, EctError> {
        cursor.read_u64_pair()
    }

    fn decode(
        _parser_version: u32,
        parameter_key: u64,
        mut body: Cursor<'a>,
    ) -> Result<Self, EctError> {
        let mode_at = body.position();
        let raw_mode = body.read_u32()?;
        let mode = TimingMode::from_raw(raw_mode).ok_or(EctError::UnsupportedMode {
            offset: mode_at,
            mode: raw_mode,
        })?;
        let num_of_timing_param = body.read_u32()?;
        let num_of_level = body.read_u32()?;

        let cells = cursor::cells(num_of_level, num_of_timing_param, mode_at)?;
        let words = cells
            .checked_mul(mode.words_per_cell())
            .ok_or(EctError::TruncatedBuffer {
                offset: body.position(),
                len: usize::MAX,
            })?;

        Ok(Self {
            parameter_key,
            mode,
            num_of_timing_param,
            num_of_level,
            timing_parameter: body.read_words(words)?,
        })
    }
}

impl<'a> NewTimingParamBlock<'a> {
    /// Entry whose key equals `key`.
    #[must_use]
    pub fn size(&self, key: u64) -> Option<&TimingParamSize<'a>> {
        self.find(|s| s.parameter_key == key)
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::NewTimingParam)
}
