//! PLL block: the P/M/S/K coefficients of every supported output frequency.

use crate::array::{Packed, Records, field};
use crate::blocks::{BlockTable, Record, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type PllBlock<'a> = BlockTable<Pll<'a>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PllFrequency {
    pub frequency: u32,
    pub p: u32,
    pub m: u32,
    pub s: u32,
    pub k: u32,
}

impl Packed for PllFrequency {
    const SIZE: usize = 20;

    fn unpack(bytes: &[u8]) -> Self {
        Self {
            frequency: field(bytes, 0),
            p: field(bytes, 1),
            m: field(bytes, 2),
            s: field(bytes, 3),
            k: field(bytes, 4),
        }
    }
}

#[derive(Debug)]
pub struct Pll<'a> {
    pub name: &'a str,
    pub type_pll: u32,
    pub frequencies: Records<'a, PllFrequency>,
}

impl Pll<'_> {
    /// Coefficients for exactly `frequency`.
    #[must_use]
    pub fn frequency(&self, frequency: u32) -> Option<PllFrequency> {
        self.frequencies.iter().find(|f| f.frequency == frequency)
    }
}

impl<'a> Record<'a> for Pll<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(_parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let type_pll = body.read_u32()?;
        let at = body.position();
        let num_of_frequency = cursor::count(body.read_u32()?, at)?;

        Ok(Self {
            name,
            type_pll,
            frequencies: body.read_records(num_of_frequency)?,
        })
    }
}

impl<'a> PllBlock<'a> {
    /// First PLL whose stored name occurs within `name`.
    ///
    /// Unlike the other lookups this is a substring test: a query such as
    /// `"CMU_CPU_PLL0"` finds a PLL stored as `"CPU_PLL"`. Only when no
    /// stored name fits does a fragment like `"PLL"` match the first PLL
    /// whose name contains it.
    #[must_use]
    pub fn pll(&self, name: &str) -> Option<&Pll<'a>> {
        if name.is_empty() {
            return None;
        }
        self.find(|p| name.contains(p.name))
            .or_else(|| self.find(|p| p.name.contains(name)))
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::Pll)
}
