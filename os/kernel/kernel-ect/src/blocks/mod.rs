//! # Block Decoders
//!
//! Every named block shares one layout:
//!
//! ```text
//! +0  parser_version u32
//! +4  version        4 ASCII bytes
//! +8  count          u32
//! +12 count × { key, offset: u32 }   key is a padded name (or a 64-bit key)
//! ...
//!     record bodies, each at block_base + offset
//! ```
//!
//! Decoding runs in two stages: the complete key/offset table is collected
//! first, then each body is decoded at its offset. Record bodies have no
//! length field, so the table must be read in full before any body is
//! followed.
//!
//! The block's `parser_version` gates which fields each record body carries.

use alloc::vec::Vec;

use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub mod ap_thermal;
pub mod asv;
pub mod dvfs;
pub mod gen_param;
pub mod margin;
pub mod minlock;
pub mod new_timing;
pub mod pll;

pub use ap_thermal::{ApThermalBlock, ApThermalFunction, ApThermalRange};
pub use asv::{AsvBlock, VoltageDomain, VoltageTable, Voltages};
pub use dvfs::{DvfsBlock, DvfsClocks, DvfsDomain, DvfsLevel};
pub use gen_param::{GenParamBlock, GenParamTable};
pub use margin::{MarginBlock, MarginDomain, Margins};
pub use minlock::{MinlockBlock, MinlockDomain, MinlockLevel};
pub use new_timing::{NewTimingParamBlock, TimingMode, TimingParamSize};
pub use pll::{Pll, PllBlock, PllFrequency};

/// Fixed step of the PMIC, in microvolts, applied to compact step matrices.
pub const VOLTAGE_STEP_UV: u32 = 6250;

/// Smallest encoded key/offset pair: an empty name (or a 64-bit key) and an offset.
const MIN_ENTRY_SIZE: usize = 12;

/// A record type stored in a block's key/offset table.
pub trait Record<'a>: Sized {
    /// How the record is addressed in the table.
    type Key;

    /// Read the key part of one table entry.
    ///
    /// # Errors
    /// Any cursor error.
    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError>;

    /// Decode the record body at `body`.
    ///
    /// # Errors
    /// Any cursor error, or a record-specific validation error.
    fn decode(parser_version: u32, key: Self::Key, body: Cursor<'a>) -> Result<Self, EctError>;
}

/// Reads a name as the record key; shared by all name-keyed records.
pub(crate) fn read_name_key<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, EctError> {
    cursor.read_name()
}

/// A decoded block: its header fields and records in table order.
#[derive(Debug)]
pub struct BlockTable<R> {
    parser_version: u32,
    version: [u8; 4],
    records: Vec<R>,
}

impl<R> BlockTable<R> {
    #[must_use]
    pub const fn parser_version(&self) -> u32 {
        self.parser_version
    }

    #[must_use]
    pub const fn version(&self) -> [u8; 4] {
        self.version
    }

    /// Records in the order of the block's table.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record accepted by `predicate`.
    #[must_use]
    pub fn find(&self, mut predicate: impl FnMut(&R) -> bool) -> Option<&R> {
        self.records.iter().find(|r| predicate(r))
    }
}

/// Decode the block starting at `base` of `blob`.
///
/// # Errors
/// Any error of the table or of a record body; nothing decoded so far is kept.
pub fn decode_table<'a, R: Record<'a>>(
    blob: &'a [u8],
    base: usize,
) -> Result<BlockTable<R>, EctError> {
    let mut cursor = Cursor::at(blob, base)?;

    let parser_version = cursor.read_u32()?;
    let version = cursor.read_tag()?;
    let at = cursor.position();
    let count = cursor::count(cursor.read_u32()?, at)?;
    cursor.ensure(count, MIN_ENTRY_SIZE)?;

    // Stage one: the key/offset table.
    let mut entries = Vec::new();
    entries.try_reserve_exact(count)?;
    for _ in 0..count {
        let key = R::read_key(&mut cursor)?;
        let at = cursor.position();
        let offset = cursor::count(cursor.read_u32()?, at)?;
        entries.push((key, offset));
    }

    // Stage two: record bodies, relative to the block base.
    let mut records = Vec::new();
    records.try_reserve_exact(count)?;
    for (key, offset) in entries {
        let at = base.checked_add(offset).ok_or(EctError::TruncatedBuffer {
            offset: base,
            len: offset,
        })?;
        records.push(R::decode(parser_version, key, Cursor::at(blob, at)?)?);
    }

    Ok(BlockTable {
        parser_version,
        version,
        records,
    })
}

/// Boot/resume level index; `-1` in the blob, or absent before parser
/// version 2, means none.
pub(crate) fn level_index(raw: u32) -> Option<u32> {
    (raw != u32::MAX).then_some(raw)
}

/// The kinds of block a directory can name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    ApThermal,
    Asv,
    Dvfs,
    Margin,
    Pll,
    Minlock,
    GenParam,
    NewTimingParam,
}

impl BlockKind {
    /// All kinds, in registry order.
    pub const ALL: [Self; 8] = [
        Self::ApThermal,
        Self::Asv,
        Self::Dvfs,
        Self::Margin,
        Self::Pll,
        Self::Minlock,
        Self::GenParam,
        Self::NewTimingParam,
    ];

    /// Position in [`BlockKind::ALL`] and in the registry.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name the directory uses for this block.
    #[must_use]
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::ApThermal => "THERMAL_AP",
            Self::Asv => "ASV",
            Self::Dvfs => "DVFS",
            Self::Margin => "MARGIN",
            Self::Pll => "PLL",
            Self::Minlock => "MINLOCK",
            Self::GenParam => "GEN",
            Self::NewTimingParam => "NEWTIMING",
        }
    }
}

/// A decoded block of any kind.
#[derive(Debug)]
pub enum Block<'a> {
    ApThermal(ApThermalBlock<'a>),
    Asv(AsvBlock<'a>),
    Dvfs(DvfsBlock<'a>),
    Margin(MarginBlock<'a>),
    Pll(PllBlock<'a>),
    Minlock(MinlockBlock<'a>),
    GenParam(GenParamBlock<'a>),
    NewTimingParam(NewTimingParamBlock<'a>),
}

macro_rules! block_accessor {
    ($fn:ident, $variant:ident, $ty:ident) => {
        #[must_use]
        pub const fn $fn(&self) -> Option<&$ty<'a>> {
            match self {
                Self::$variant(block) => Some(block),
                _ => None,
            }
        }
    };
}

impl<'a> Block<'a> {
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::ApThermal(_) => BlockKind::ApThermal,
            Self::Asv(_) => BlockKind::Asv,
            Self::Dvfs(_) => BlockKind::Dvfs,
            Self::Margin(_) => BlockKind::Margin,
            Self::Pll(_) => BlockKind::Pll,
            Self::Minlock(_) => BlockKind::Minlock,
            Self::GenParam(_) => BlockKind::GenParam,
            Self::NewTimingParam(_) => BlockKind::NewTimingParam,
        }
    }

    block_accessor!(as_ap_thermal, ApThermal, ApThermalBlock);
    block_accessor!(as_asv, Asv, AsvBlock);
    block_accessor!(as_dvfs, Dvfs, DvfsBlock);
    block_accessor!(as_margin, Margin, MarginBlock);
    block_accessor!(as_pll, Pll, PllBlock);
    block_accessor!(as_minlock, Minlock, MinlockBlock);
    block_accessor!(as_gen_param, GenParam, GenParamBlock);
    block_accessor!(as_new_timing_param, NewTimingParam, NewTimingParamBlock);
}
