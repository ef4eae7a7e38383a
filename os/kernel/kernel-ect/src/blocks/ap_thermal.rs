//! AP thermal block: temperature ranges and the frequency cap of each.
//!
//! Ranges are copied out of the blob into an owned list.

use alloc::vec::Vec;

use crate::blocks::{BlockTable, Record, read_name_key};
use crate::cursor::{self, Cursor};
use crate::error::EctError;

pub type ApThermalBlock<'a> = BlockTable<ApThermalFunction<'a>>;

/// Encoded size of one range.
const RANGE_SIZE: usize = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ApThermalRange {
    pub lower_bound_temperature: u32,
    pub upper_bound_temperature: u32,
    pub max_frequency: u32,
    pub sw_trip: u32,
    pub flag: u32,
}

impl ApThermalRange {
    /// Whether `temperature` falls into `[lower, upper]`.
    #[must_use]
    pub const fn contains(&self, temperature: u32) -> bool {
        temperature >= self.lower_bound_temperature && temperature <= self.upper_bound_temperature
    }
}

#[derive(Debug)]
pub struct ApThermalFunction<'a> {
    pub name: &'a str,
    pub ranges: Vec<ApThermalRange>,
}

impl ApThermalFunction<'_> {
    /// First range covering `temperature`.
    #[must_use]
    pub fn range_for(&self, temperature: u32) -> Option<&ApThermalRange> {
        self.ranges.iter().find(|r| r.contains(temperature))
    }
}

impl<'a> Record<'a> for ApThermalFunction<'a> {
    type Key = &'a str;

    fn read_key(cursor: &mut Cursor<'a>) -> Result<Self::Key, EctError> {
        read_name_key(cursor)
    }

    fn decode(_parser_version: u32, name: &'a str, mut body: Cursor<'a>) -> Result<Self, EctError> {
        let at = body.position();
        let num_of_range = cursor::count(body.read_u32()?, at)?;
        body.ensure(num_of_range, RANGE_SIZE)?;

        let mut ranges = Vec::new();
        ranges.try_reserve_exact(num_of_range)?;
        for _ in 0..num_of_range {
            ranges.push(ApThermalRange {
                lower_bound_temperature: body.read_u32()?,
                upper_bound_temperature: body.read_u32()?,
                max_frequency: body.read_u32()?,
                sw_trip: body.read_u32()?,
                flag: body.read_u32()?,
            });
        }

        Ok(Self { name, ranges })
    }
}

impl<'a> ApThermalBlock<'a> {
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&ApThermalFunction<'a>> {
        self.find(|f| f.name == name)
    }
}

pub(crate) fn decode_block(blob: &[u8], base: usize) -> Result<crate::Block<'_>, EctError> {
    super::decode_table(blob, base).map(crate::Block::ApThermal)
}
