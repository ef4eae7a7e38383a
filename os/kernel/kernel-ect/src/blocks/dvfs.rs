//! DVFS block: per-domain frequency levels and the clock settings of each level.
//!
//! Domain body:
//!
//! ```text
//! max_frequency, min_frequency               u32
//! boot_level_idx, resume_level_idx           u32, parser_version >= 2
//! mode                                       u32, parser_version >= 3
//! num_of_clock, num_of_level                 u32
//! clocks                                     mode 0: num_of_clock padded names
//!                                            mode 1: num_of_clock SFR addresses
//! levels                                     num_of_level × { level u32, level_en i32 }
//! values                                     num_of_level × num_of_clock u32, row-major
//! ```

use alloc::vec::Vec;

use crate::array::{Packed, Records, Words, field};
use crate::blocks::{BlockTable, Record, level_index, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;
use crate::platform::Platform;

/// Mode selector: clocks are given by name.
pub const MODE_CLOCK_NAME: u32 = 0;

/// Mode selector: clocks are given by SFR address.
pub const MODE_SFR_ADDRESS: u32 = 1;

pub type DvfsBlock<'a> = BlockTable<DvfsDomain<'a>>;

/// How a domain identifies its clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DvfsClocks<'a> {
    /// Clock names, collected from the blob's string list.
    Names(Vec<&'a str>),
    /// Raw SFR addresses, borrowed in place.
    SfrAddresses(Words<'a>),
}

impl DvfsClocks<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Names(names) => names.len(),
            Self::SfrAddresses(addresses) => addresses.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One frequency level of a domain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DvfsLevel {
    pub level: u32,
    pub level_en: bool,
}

impl Packed for DvfsLevel {
    const SIZE: usize = 8;

    fn unpack(bytes: &[u8]) -> Self {
        Self {
            level: field(bytes, 0),
            level_en: field(bytes, 1) != 0,
        }
    }
}

#[derive(Debug)]
pub struct DvfsDomain<'a> {
    pub name: &'a str,
    pub max_frequency: u32,
    pub min_frequency: u32,
    pub boot_level_idx: Option<u32>,
    pub resume_level_idx: Option<u32>,
    pub clocks: DvfsClocks<'a>,
    pub levels: Records<'a, DvfsLevel>,
    /// `num_of_level × num_of_clock` settings, row-major by level.
    pub values: Words<'a>,
}

impl DvfsDomain<'_> {
    #[must_use]
    pub fn num_of_clock(&self) -> usize {
        self.clocks.len()
    }

    #[must_use]
    pub const fn num_of_level(&self) -> usize {
        self.levels.len()
    }

    /// Setting of `clock` at `level`.
    #[must_use]
    pub fn value(&self, level: usize, clock: usize) -> Option<u32> {
        let clocks = self.num_of_clock();
        if clock >= clocks {
            return None;
        }
        self.values.get(level.checked_mul(clocks)?.checked_add(clock)?)
    }
}

impl<'a> Record<'a> for DvfsDomain<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let max_frequency = body.read_u32()?;
        let min_frequency = body.read_u32()?;

        let (boot_level_idx, resume_level_idx) = if parser_version >= 2 {
            (level_index(body.read_u32()?), level_index(body.read_u32()?))
        } else {
            (None, None)
        };

        let mode_at = body.position();
        let mode = if parser_version >= 3 {
            body.read_u32()?
        } else {
            MODE_CLOCK_NAME
        };

        let at = body.position();
        let num_of_clock = body.read_u32()?;
        let num_of_level = body.read_u32()?;
        let clock_count = cursor::count(num_of_clock, at)?;

        let clocks = match mode {
            MODE_CLOCK_NAME => {
                body.ensure(clock_count, 8)?;
                let mut names = Vec::new();
                names.try_reserve_exact(clock_count)?;
                for _ in 0..clock_count {
                    names.push(body.read_name()?);
                }
                DvfsClocks::Names(names)
            }
            MODE_SFR_ADDRESS => DvfsClocks::SfrAddresses(body.read_words(clock_count)?),
            mode => {
                return Err(EctError::UnsupportedMode {
                    offset: mode_at,
                    mode,
                });
            }
        };

        let levels = body.read_records(cursor::count(num_of_level, at)?)?;
        let values = body.read_words(cursor::cells(num_of_level, num_of_clock, at)?)?;

        Ok(Self {
            name,
            max_frequency,
            min_frequency,
            boot_level_idx,
            resume_level_idx,
            clocks,
            levels,
            values,
        })
    }
}

impl<'a> DvfsBlock<'a> {
    /// Domain named `name`, after the platform rename.
    #[must_use]
    pub fn domain(&self, name: &str, platform: &Platform) -> Option<&DvfsDomain<'a>> {
        self.find(|d| platform.matches(name, d.name))
    }
}

/// Decoder registered for [`crate::BlockKind::Dvfs`].
pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::Dvfs)
}
