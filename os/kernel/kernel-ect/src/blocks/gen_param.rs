//! Generic-parameter block: named `rows × cols` word matrices.

use crate::array::Words;
use crate::blocks::{BlockTable, Record, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type GenParamBlock<'a> = BlockTable<GenParamTable<'a>>;

#[derive(Debug)]
pub struct GenParamTable<'a> {
    pub name: &'a str,
    pub num_of_col: u32,
    pub num_of_row: u32,
    /// Row-major parameters.
    pub parameter: Words<'a>,
}

impl GenParamTable<'_> {
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        let cols = usize::try_from(self.num_of_col).ok()?;
        if col >= cols {
            return None;
        }
        self.parameter.get(row.checked_mul(cols)?.checked_add(col)?)
    }

    /// Row `row` as a word view.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Words<'_>> {
        let cols = usize::try_from(self.num_of_col).ok()?;
        let start = row.checked_mul(cols)?.checked_mul(4)?;
        let end = start.checked_add(cols.checked_mul(4)?)?;
        self.parameter.as_bytes().get(start..end).map(Words::new)
    }
}

impl<'a> Record<'a> for GenParamTable<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(_parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let at = body.position();
        let num_of_col = body.read_u32()?;
        let num_of_row = body.read_u32()?;

        Ok(Self {
            name,
            num_of_col,
            num_of_row,
            parameter: body.read_words(cursor::cells(num_of_row, num_of_col, at)?)?,
        })
    }
}

impl<'a> GenParamBlock<'a> {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&GenParamTable<'a>> {
        self.find(|t| t.name == name)
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::GenParam)
}
