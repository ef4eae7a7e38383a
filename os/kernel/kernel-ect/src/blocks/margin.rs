//! Margin block: per-domain voltage offsets, one column per group.
//!
//! From parser version 2 the offsets are stored as byte-sized steps of
//! [`VOLTAGE_STEP_UV`] instead of raw words.

use crate::array::Words;
use crate::blocks::{BlockTable, Record, VOLTAGE_STEP_UV, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type MarginBlock<'a> = BlockTable<MarginDomain<'a>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Margins<'a> {
    Raw(Words<'a>),
    Compact { steps: &'a [u8], step_uv: u32 },
}

impl Margins<'_> {
    /// Offset of matrix cell `index`, in microvolts.
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
pub struct MarginDomain<'a> {
    pub name: &'a str,
    pub num_of_group: u32,
    pub num_of_level: u32,
    pub offsets: Margins<'a>,
}

impl MarginDomain<'_> {
    /// Offset of `group` at `level`, in microvolts.
    #[must_use]
    pub fn offset(&self, level: usize, group: usize) -> Option<u32> {
        let groups = usize::try_from(self.num_of_group).ok()?;
        if group >= groups {
            return None;
        }
        self.offsets.get(level.checked_mul(groups)?.checked_add(group)?)
    }
}

impl<'a> Record<'a> for MarginDomain<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let at = body.position();
        let num_of_group = body.read_u32()?;
        let num_of_level = body.read_u32()?;
        let cells = cursor::cells(num_of_level, num_of_group, at)?;

        let offsets = if parser_version >= 2 {
            Margins::Compact {
                steps: body.take(cells)?,
                step_uv: VOLTAGE_STEP_UV,
            }
        } else {
            Margins::Raw(body.read_words(cells)?)
        };

        Ok(Self {
            name,
            num_of_group,
            num_of_level,
            offsets,
        })
    }
}

impl<'a> MarginBlock<'a> {
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&MarginDomain<'a>> {
        self.find(|d| d.name == name)
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::Margin)
}
