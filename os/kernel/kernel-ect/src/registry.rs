//! # Registry
//!
//! Fixed table mapping block names to their decoders. Directory dispatch
//! picks the first entry whose name is a prefix of the directory name
//! ([`match_directory_name`]); block lookup by name is exact ([`by_name`]).

use crate::blocks::{self, Block, BlockKind};
use crate::error::EctError;

/// Decodes the block that starts at byte `base` of the blob.
pub type DecodeFn = for<'a> fn(&'a [u8], usize) -> Result<Block<'a>, EctError>;

/// A registered block decoder.
pub struct RegistryEntry {
    pub kind: BlockKind,
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl core::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

const fn entry(kind: BlockKind, decode: DecodeFn) -> RegistryEntry {
    RegistryEntry {
        kind,
        name: kind.block_name(),
        decode,
    }
}

/// All decoders, indexed by [`BlockKind::index`].
pub static REGISTRY: [RegistryEntry; 8] = [
    entry(BlockKind::ApThermal, blocks::ap_thermal::decode_block),
    entry(BlockKind::Asv, blocks::asv::decode_block),
    entry(BlockKind::Dvfs, blocks::dvfs::decode_block),
    entry(BlockKind::Margin, blocks::margin::decode_block),
    entry(BlockKind::Pll, blocks::pll::decode_block),
    entry(BlockKind::Minlock, blocks::minlock::decode_block),
    entry(BlockKind::GenParam, blocks::gen_param::decode_block),
    entry(BlockKind::NewTimingParam, blocks::new_timing::decode_block),
];

/// Registry entry for a block kind.
#[must_use]
pub fn for_kind(kind: BlockKind) -> &'static RegistryEntry {
    &REGISTRY[kind.index()]
}

/// First entry whose name starts `directory_name`.
///
/// # Errors
/// [`EctError::UnknownBlockName`] if no entry matches.
pub fn match_directory_name(directory_name: &str) -> Result<&'static RegistryEntry, EctError> {
    REGISTRY
        .iter()
        .find(|e| directory_name.starts_with(e.name))
        .ok_or(EctError::UnknownBlockName)
}

/// Entry whose name equals `name`.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_indexed_by_kind() {
        for kind in BlockKind::ALL {
            assert_eq!(for_kind(kind).kind, kind);
        }
    }

    #[test]
    fn directory_names_match_by_prefix() {
        assert_eq!(match_directory_name("DVFS").unwrap().kind, BlockKind::Dvfs);
        assert_eq!(match_directory_name("DVFS_V2").unwrap().kind, BlockKind::Dvfs);
        assert_eq!(
            match_directory_name("THERMAL_AP").unwrap().kind,
            BlockKind::ApThermal
        );
        assert_eq!(
            match_directory_name("NEWTIMING").unwrap().kind,
            BlockKind::NewTimingParam
        );
        assert_eq!(match_directory_name("GEN").unwrap().kind, BlockKind::GenParam);
    }

    #[test]
    fn unknown_names_are_reported() {
        assert_eq!(
            match_directory_name("RCC").unwrap_err(),
            EctError::UnknownBlockName
        );
        assert_eq!(
            match_directory_name("TIMING").unwrap_err(),
            EctError::UnknownBlockName
        );
        assert_eq!(
            match_directory_name("DV").unwrap_err(),
            EctError::UnknownBlockName
        );
    }

    #[test]
    fn exact_lookup_rejects_prefixes() {
        assert!(by_name("PLL").is_some());
        assert!(by_name("PLL_EXTRA").is_none());
        assert!(by_name("").is_none());
    }
}
