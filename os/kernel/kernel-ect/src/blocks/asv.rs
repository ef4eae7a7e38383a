//! ASV block: voltage tables per domain, one column per ASV group.
//!
//! Domain body:
//!
//! ```text
//! num_of_group, num_of_level, num_of_table   u32
//! level frequencies                          num_of_level × u32
//! num_of_table × voltage table, back to back:
//!   table_version                            u32
//!   boot_level_idx, resume_level_idx         u32, parser_version >= 2
//!   level_en                                 num_of_level × i32, parser_version >= 2
//!   voltages                                 parser_version >= 3: num_of_level × num_of_group u8 steps
//!                                            otherwise:           num_of_level × num_of_group u32
//! ```
//!
//! A byte-sized step matrix leaves the next table unaligned; the word views
//! cope with that.

use alloc::vec::Vec;

use crate::array::Words;
use crate::blocks::{BlockTable, Record, VOLTAGE_STEP_UV, level_index, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;
use crate::platform::Platform;

pub type AsvBlock<'a> = BlockTable<VoltageDomain<'a>>;

/// Voltage matrix of a table, in whichever encoding the parser version uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Voltages<'a> {
    /// Voltages in microvolts.
    Raw(Words<'a>),
    /// Step indices; the voltage is `step * step_uv`.
    Compact { steps: &'a [u8], step_uv: u32 },
}

impl Voltages<'_> {
    /// Voltage of matrix cell `index`, in microvolts.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            Self::Raw(words) => words.get(index),
            Self::Compact { steps, step_uv } => steps
                .get(index)
                .map(|&s| u32::from(s).saturating_mul(*step_uv)),
        }
    }
}

#[derive(Debug)]
pub struct VoltageTable<'a> {
    pub table_version: u32,
    pub boot_level_idx: Option<u32>,
    pub resume_level_idx: Option<u32>,
    /// Per-level enable flags; present from parser version 2.
    pub level_en: Option<Words<'a>>,
    pub voltages: Voltages<'a>,
}

#[derive(Debug)]
pub struct VoltageDomain<'a> {
    pub name: &'a str,
    pub num_of_group: u32,
    pub num_of_level: u32,
    /// Frequency of each level.
    pub levels: Words<'a>,
    pub tables: Vec<VoltageTable<'a>>,
}

impl VoltageDomain<'_> {
    /// Voltage of `group` at `level` in table `table`, in microvolts.
    #[must_use]
    pub fn voltage(&self, table: usize, level: usize, group: usize) -> Option<u32> {
        let groups = usize::try_from(self.num_of_group).ok()?;
        if group >= groups {
            return None;
        }
        let index = level.checked_mul(groups)?.checked_add(group)?;
        self.tables.get(table)?.voltages.get(index)
    }

    /// Whether `level` is enabled in table `table`. Tables without an enable
    /// mask enable every level.
    #[must_use]
    pub fn level_enabled(&self, table: usize, level: usize) -> Option<bool> {
        let table = self.tables.get(table)?;
        match table.level_en {
            Some(mask) => mask.get(level).map(|en| en != 0),
            None => (level < self.levels.len()).then_some(true),
        }
    }
}

fn read_table<'a>(
    parser_version: u32,
    body: &mut Cursor<'a>,
    levels: usize,
    cells: usize,
) -> Result<VoltageTable<'a>, EctError> {
    let table_version = body.read_u32()?;

    let (boot_level_idx, resume_level_idx, level_en) = if parser_version >= 2 {
        let boot = level_index(body.read_u32()?);
        let resume = level_index(body.read_u32()?);
        (boot, resume, Some(body.read_words(levels)?))
    } else {
        (None, None, None)
    };

    let voltages = if parser_version >= 3 {
        Voltages::Compact {
            steps: body.take(cells)?,
            step_uv: VOLTAGE_STEP_UV,
        }
    } else {
        Voltages::Raw(body.read_words(cells)?)
    };

    Ok(VoltageTable {
        table_version,
        boot_level_idx,
        resume_level_idx,
        level_en,
        voltages,
    })
}

impl<'a> Record<'a> for VoltageDomain<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let at = body.position();
        let num_of_group = body.read_u32()?;
        let num_of_level = body.read_u32()?;
        let num_of_table = cursor::count(body.read_u32()?, at)?;

        let level_count = cursor::count(num_of_level, at)?;
        let cells = cursor::cells(num_of_level, num_of_group, at)?;
        let levels = body.read_words(level_count)?;

        // Every table carries at least its version word.
        body.ensure(num_of_table, 4)?;
        let mut tables = Vec::new();
        tables.try_reserve_exact(num_of_table)?;
        for _ in 0..num_of_table {
            tables.push(read_table(parser_version, &mut body, level_count, cells)?);
        }

        Ok(Self {
            name,
            num_of_group,
            num_of_level,
            levels,
            tables,
        })
    }
}

impl<'a> AsvBlock<'a> {
    /// Domain named `name`, after the platform rename.
    #[must_use]
    pub fn domain(&self, name: &str, platform: &Platform) -> Option<&VoltageDomain<'a>> {
        self.find(|d| platform.matches(name, d.name))
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::Asv)
}
