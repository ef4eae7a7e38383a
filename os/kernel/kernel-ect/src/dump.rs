//! # Text Dump
//!
//! Renders the decoded table as indented `[FIELD] : value` text. Every block
//! kind has its own node, the header has one, and [`Node::All`] prints the
//! header followed by every decoded block in directory order.
//!
//! ```text
//! [ECT] : PLL Information
//! 	[PARSER VERSION] : 1
//! 	[VERSION] : 0001
//! 	[NUM OF PLL] : 1
//! 		[PLL NAME] : CPU_PLL
//! 		...
//! ```
//!
//! Compact step matrices are printed as microvolts, not as raw steps.

use core::fmt::{self, Display, Formatter, Write};

use crate::blocks::{
    ApThermalBlock, AsvBlock, Block, BlockKind, BlockTable, DvfsBlock, DvfsClocks, GenParamBlock,
    MarginBlock, MinlockBlock, NewTimingParamBlock, PllBlock,
};
use crate::header::VersionTag;
use crate::table::Ect;

/// A dump node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Node {
    Header,
    Block(BlockKind),
    All,
}

/// Every node with its name.
pub const NODES: [(&str, Node); 10] = [
    ("header_dump", Node::Header),
    ("ap_thermal_dump", Node::Block(BlockKind::ApThermal)),
    ("asv_dump", Node::Block(BlockKind::Asv)),
    ("dvfs_dump", Node::Block(BlockKind::Dvfs)),
    ("margin_dump", Node::Block(BlockKind::Margin)),
    ("pll_dump", Node::Block(BlockKind::Pll)),
    ("minlock_dump", Node::Block(BlockKind::Minlock)),
    ("gen_param_dump", Node::Block(BlockKind::GenParam)),
    ("new_timing_param_dump", Node::Block(BlockKind::NewTimingParam)),
    ("all_dump", Node::All),
];

impl Node {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        NODES.iter().find(|(n, _)| *n == name).map(|&(_, node)| node)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        NODES
            .iter()
            .find(|(_, node)| *node == self)
            .map_or("", |&(name, _)| name)
    }
}

impl BlockKind {
    /// Title of the block's dump section.
    const fn title(self) -> &'static str {
        match self {
            Self::ApThermal => "AP Thermal",
            Self::Asv => "ASV Voltage",
            Self::Dvfs => "DVFS",
            Self::Margin => "Margin",
            Self::Pll => "PLL",
            Self::Minlock => "Minlock",
            Self::GenParam => "General-Parameter",
            Self::NewTimingParam => "New Timing-Parameter",
        }
    }

    /// Phrase used when the block was not decoded.
    const fn missing(self) -> &'static str {
        match self {
            Self::ApThermal => "ap thermal",
            Self::Asv => "asv",
            Self::Dvfs => "dvfs",
            Self::Margin => "margin",
            Self::Pll => "pll",
            Self::Minlock => "minlock",
            Self::GenParam => "general parameter",
            Self::NewTimingParam => "new timing parameter",
        }
    }
}

/// `NONE` for an absent level index.
struct LevelIdx(Option<u32>);

impl Display for LevelIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(idx) => write!(f, "{idx}"),
            None => f.write_str("NONE"),
        }
    }
}

/// Upper-case hex without prefix.
struct Hex(u64);

impl Display for Hex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

fn dim(value: u32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn write_matrix<T: Display>(
    f: &mut impl Write,
    indent: &str,
    rows: usize,
    cols: usize,
    cell: impl Fn(usize, usize) -> Option<T>,
) -> fmt::Result {
    for row in 0..rows {
        f.write_str(indent)?;
        for col in 0..cols {
            if let Some(value) = cell(row, col) {
                write!(f, "{value} ")?;
            }
        }
        f.write_char('\n')?;
    }
    Ok(())
}

fn preamble<R>(
    f: &mut Formatter<'_>,
    kind: BlockKind,
    table: &BlockTable<R>,
    count_label: &str,
) -> fmt::Result {
    writeln!(f, "[ECT] : {} Information", kind.title())?;
    writeln!(f, "\t[PARSER VERSION] : {}", table.parser_version())?;
    writeln!(f, "\t[VERSION] : {}", VersionTag(table.version()))?;
    writeln!(f, "\t[NUM OF {count_label}] : {}", table.len())
}

impl Display for ApThermalBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::ApThermal, self, "FUNCTION")?;
        for function in self.records() {
            writeln!(f, "\t\t[FUNCTION NAME] : {}", function.name)?;
            writeln!(f, "\t\t[NUM OF RANGE] : {}", function.ranges.len())?;
            for range in &function.ranges {
                writeln!(
                    f,
                    "\t\t\t[LOWER BOUND TEMPERATURE] : {}",
                    range.lower_bound_temperature
                )?;
                writeln!(
                    f,
                    "\t\t\t[UPPER BOUND TEMPERATURE] : {}",
                    range.upper_bound_temperature
                )?;
                writeln!(f, "\t\t\t[MAX FREQUENCY] : {}", range.max_frequency)?;
                writeln!(f, "\t\t\t[SW TRIP] : {}", range.sw_trip)?;
                writeln!(f, "\t\t\t[FLAG] : {}", range.flag)?;
            }
        }
        Ok(())
    }
}

impl Display for AsvBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::Asv, self, "DOMAIN")?;
        for domain in self.records() {
            writeln!(f, "\t\t[DOMAIN NAME] : {}", domain.name)?;
            writeln!(f, "\t\t[NUM OF ASV GROUP] : {}", domain.num_of_group)?;
            writeln!(f, "\t\t[NUM OF LEVEL] : {}", domain.num_of_level)?;
            for frequency in domain.levels.iter() {
                writeln!(f, "\t\t\t[FREQUENCY] : {frequency}")?;
            }
            writeln!(f, "\t\t[NUM OF TABLE] : {}", domain.tables.len())?;
            for (index, table) in domain.tables.iter().enumerate() {
                writeln!(f, "\t\t\t[TABLE VERSION] : {}", table.table_version)?;
                writeln!(f, "\t\t\t[BOOT LEVEL IDX] : {}", LevelIdx(table.boot_level_idx))?;
                writeln!(f, "\t\t\t[RESUME LEVEL IDX] : {}", LevelIdx(table.resume_level_idx))?;
                writeln!(f, "\t\t\t\t[TABLE]")?;
                write_matrix(
                    f,
                    "\t\t\t\t",
                    dim(domain.num_of_level),
                    dim(domain.num_of_group),
                    |level, group| domain.voltage(index, level, group),
                )?;
            }
        }
        Ok(())
    }
}

impl Display for DvfsBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::Dvfs, self, "DOMAIN")?;
        for domain in self.records() {
            writeln!(f, "\t\t[DOMAIN NAME] : {}", domain.name)?;
            writeln!(f, "\t\t[BOOT LEVEL IDX] : {}", LevelIdx(domain.boot_level_idx))?;
            writeln!(f, "\t\t[RESUME LEVEL IDX] : {}", LevelIdx(domain.resume_level_idx))?;
            writeln!(f, "\t\t[MAX FREQ] : {}", domain.max_frequency)?;
            writeln!(f, "\t\t[MIN FREQ] : {}", domain.min_frequency)?;
            match &domain.clocks {
                DvfsClocks::Names(names) => {
                    writeln!(f, "\t\t[NUM OF CLOCK] : {}", names.len())?;
                    for name in names {
                        writeln!(f, "\t\t\t[CLOCK NAME] : {name}")?;
                    }
                }
                DvfsClocks::SfrAddresses(addresses) => {
                    writeln!(f, "\t\t[NUM OF SFR] : {}", addresses.len())?;
                    for address in addresses.iter() {
                        writeln!(f, "\t\t\t[SFR ADDRESS] : {address:x}")?;
                    }
                }
            }
            writeln!(f, "\t\t[NUM OF LEVEL] : {}", domain.num_of_level())?;
            for level in domain.levels.iter() {
                let en = if level.level_en { 'O' } else { 'X' };
                writeln!(f, "\t\t\t[LEVEL] : {}({en})", level.level)?;
            }
            writeln!(f, "\t\t\t\t[TABLE]")?;
            write_matrix(
                f,
                "\t\t\t\t",
                domain.num_of_level(),
                domain.num_of_clock(),
                |level, clock| domain.value(level, clock),
            )?;
        }
        Ok(())
    }
}

impl Display for MarginBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::Margin, self, "DOMAIN")?;
        for domain in self.records() {
            writeln!(f, "\t\t[DOMAIN NAME] : {}", domain.name)?;
            writeln!(f, "\t\t[NUM OF GROUP] : {}", domain.num_of_group)?;
            writeln!(f, "\t\t[NUM OF LEVEL] : {}", domain.num_of_level)?;
            writeln!(f, "\t\t\t[TABLE]")?;
            write_matrix(
                f,
                "\t\t\t",
                dim(domain.num_of_level),
                dim(domain.num_of_group),
                |level, group| domain.offset(level, group),
            )?;
        }
        Ok(())
    }
}

impl Display for PllBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::Pll, self, "PLL")?;
        for pll in self.records() {
            writeln!(f, "\t\t[PLL NAME] : {}", pll.name)?;
            writeln!(f, "\t\t[PLL TYPE] : {}", pll.type_pll)?;
            writeln!(f, "\t\t[NUM OF FREQUENCY] : {}", pll.frequencies.len())?;
            for frequency in pll.frequencies.iter() {
                writeln!(f, "\t\t\t[FREQUENCY] : {}", frequency.frequency)?;
                writeln!(f, "\t\t\t[P] : {}", frequency.p)?;
                writeln!(f, "\t\t\t[M] : {}", frequency.m)?;
                writeln!(f, "\t\t\t[S] : {}", frequency.s)?;
                writeln!(f, "\t\t\t[K] : {}", frequency.k)?;
            }
        }
        Ok(())
    }
}

impl Display for MinlockBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::Minlock, self, "DOMAIN")?;
        for domain in self.records() {
            writeln!(f, "\t\t[DOMAIN NAME] : {}", domain.name)?;
            for level in domain.levels.iter() {
                writeln!(
                    f,
                    "\t\t\t[Frequency] : (MAIN){}, (SUB){}",
                    level.main_frequency, level.sub_frequency
                )?;
            }
        }
        Ok(())
    }
}

impl Display for GenParamBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::GenParam, self, "TABLE")?;
        for table in self.records() {
            writeln!(f, "\t\t[TABLE NAME] : {}", table.name)?;
            writeln!(f, "\t\t[NUM OF COLUMN] : {}", table.num_of_col)?;
            writeln!(f, "\t\t[NUM OF ROW] : {}", table.num_of_row)?;
            writeln!(f, "\t\t\t[TABLE]")?;
            write_matrix(
                f,
                "\t\t\t",
                dim(table.num_of_row),
                dim(table.num_of_col),
                |row, col| table.get(row, col),
            )?;
        }
        Ok(())
    }
}

impl Display for NewTimingParamBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        preamble(f, BlockKind::NewTimingParam, self, "SIZE")?;
        for size in self.records() {
            writeln!(f, "\t\t[PARAMETER KEY] : {}", Hex(size.parameter_key))?;
            writeln!(f, "\t\t[NUM OF TIMING PARAMETER] : {}", size.num_of_timing_param)?;
            writeln!(f, "\t\t[NUM OF LEVEL] : {}", size.num_of_level)?;
            writeln!(f, "\t\t\t[TABLE]")?;
            write_matrix(
                f,
                "\t\t\t",
                dim(size.num_of_level),
                dim(size.num_of_timing_param),
                |level, param| size.value(level, param).map(Hex),
            )?;
        }
        Ok(())
    }
}

impl Display for Block<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApThermal(block) => block.fmt(f),
            Self::Asv(block) => block.fmt(f),
            Self::Dvfs(block) => block.fmt(f),
            Self::Margin(block) => block.fmt(f),
            Self::Pll(block) => block.fmt(f),
            Self::Minlock(block) => block.fmt(f),
            Self::GenParam(block) => block.fmt(f),
            Self::NewTimingParam(block) => block.fmt(f),
        }
    }
}

impl Ect<'_> {
    /// Write the header section.
    ///
    /// # Errors
    /// Only errors of `out`.
    pub fn dump_header(&self, out: &mut impl Write) -> fmt::Result {
        let header = self.header();
        writeln!(out, "[ECT] : ECT Information")?;
        if let Some(base) = self.phys_base() {
            writeln!(out, "\t[PA] : {base:#x}")?;
        }
        writeln!(out, "\t[SIGN] : {}", VersionTag(header.sign))?;
        writeln!(out, "\t[VERSION] : {}", header.version_str())?;
        writeln!(out, "\t[TOTAL SIZE] : {}", header.total_size)?;
        writeln!(out, "\t[NUM OF HEADER] : {}", header.num_of_header)
    }

    /// Write the section of block `kind`, or a notice if it was not decoded.
    ///
    /// # Errors
    /// Only errors of `out`.
    pub fn dump_block(&self, kind: BlockKind, out: &mut impl Write) -> fmt::Result {
        match self.block(kind) {
            Some(block) => write!(out, "{block}"),
            None => writeln!(out, "[ECT] : there is no {} information", kind.missing()),
        }
    }

    /// Write the header, then every decoded block in directory order.
    ///
    /// # Errors
    /// Only errors of `out`.
    pub fn dump_all(&self, out: &mut impl Write) -> fmt::Result {
        self.dump_header(out)?;
        for block in self.blocks() {
            write!(out, "{block}")?;
        }
        Ok(())
    }

    /// Write `node`.
    ///
    /// # Errors
    /// Only errors of `out`.
    pub fn dump(&self, node: Node, out: &mut impl Write) -> fmt::Result {
        match node {
            Node::Header => self.dump_header(out),
            Node::Block(kind) => self.dump_block(kind, out),
            Node::All => self.dump_all(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_names_round_trip() {
        for (name, node) in NODES {
            assert_eq!(Node::from_name(name), Some(node));
            assert_eq!(node.name(), name);
        }
        assert_eq!(Node::from_name("dvfs"), None);
    }

    #[test]
    fn every_block_kind_has_a_node() {
        for kind in BlockKind::ALL {
            assert!(NODES.iter().any(|(_, node)| *node == Node::Block(kind)));
        }
    }

    #[test]
    fn level_index_prints_none() {
        assert_eq!(LevelIdx(None).to_string(), "NONE");
        assert_eq!(LevelIdx(Some(3)).to_string(), "3");
    }

    #[test]
    fn matrix_rows_are_space_terminated() {
        let mut out = String::new();
        write_matrix(&mut out, "\t", 2, 3, |r, c| Some(r * 10 + c)).unwrap();
        assert_eq!(out, "\t0 1 2 \n\t10 11 12 \n");
    }

    #[test]
    fn hex_is_upper_case_without_prefix() {
        assert_eq!(Hex(0x1_2345_abcd).to_string(), "12345ABCD");
    }
}
