//! Min-lock block: the sub-domain frequency each main-domain level pins.

use crate::array::{Packed, Records, field};
use crate::blocks::{BlockTable, Record, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type MinlockBlock<'a> = BlockTable<MinlockDomain<'a>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinlockLevel {
    pub main_frequency: u32,
    pub sub_frequency: u32,
}

impl Packed for MinlockLevel {
    const SIZE: usize = 8;

    fn unpack(bytes: &[u8]) -> Self {
        Self {
            main_frequency: field(bytes, 0),
            sub_frequency: field(bytes, 1),
        }
    }
}

#[derive(Debug)]
pub struct MinlockDomain<'a> {
    pub name: &'a str,
    pub levels: Records<'a, MinlockLevel>,
}

impl MinlockDomain<'_> {
    /// Sub frequency locked while the main domain runs at `main_frequency`.
    #[must_use]
    pub fn sub_frequency(&self, main_frequency: u32) -> Option<u32> {
        self.levels
            .iter()
            .find(|l| l.main_frequency == main_frequency)
            .map(|l| l.sub_frequency)
    }
}

impl<'a> Record<'a> for MinlockDomain<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(_parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let at = body.position();
        let num_of_level = cursor::count(body.read_u32()?, at)?;

        Ok(Self {
            name,
            levels: body.read_records(num_of_level)?,
        })
    }
}

impl<'a> MinlockBlock<'a> {
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&MinlockDomain<'a>> {
        self.find(|d| d.name == name)
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::Minlock)
}
