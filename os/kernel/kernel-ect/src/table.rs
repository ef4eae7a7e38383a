//! The decoded characteristic table.

use log::{debug, error, info, warn};

use crate::blocks::{
    ApThermalBlock, ApThermalFunction, AsvBlock, Block, BlockKind, DvfsBlock, DvfsDomain,
    GenParamBlock, GenParamTable, MarginBlock, MarginDomain, MinlockBlock, MinlockDomain,
    NewTimingParamBlock, Pll, PllBlock, TimingParamSize, VoltageDomain,
};
use crate::cursor::{self, Cursor};
use crate::error::EctError;
use crate::header::{Directory, EctHeader, HEADER_SIZE};
use crate::platform::Platform;
use crate::registry;
use crate::{PhysMapRo, ReservedRegion};

/// A decoded block and its position in the directory.
#[derive(Debug)]
struct Slot<'a> {
    precedence: usize,
    block: Block<'a>,
}

/// All blocks decoded from one blob.
///
/// Decoded records borrow names and arrays straight from the blob, so the
/// blob must outlive the table; the `'a` lifetime enforces that. The table is
/// immutable once built and can be shared freely between readers.
#[derive(Debug)]
pub struct Ect<'a> {
    blob: &'a [u8],
    phys_base: Option<u64>,
    platform: Platform,
    header: EctHeader,
    slots: [Option<Slot<'a>>; 8],
}

impl<'a> Ect<'a> {
    /// Decode every known block of `blob`.
    ///
    /// The directory is walked once, in order. Entries whose name matches no
    /// registered decoder are skipped; any other failure aborts the decode
    /// and nothing is returned.
    ///
    /// # Errors
    /// [`EctError::BadSignature`] for a blob without the `PARA` marker,
    /// otherwise the first error raised by the directory or a block decoder.
    pub fn parse(blob: &'a [u8], platform: Platform) -> Result<Self, EctError> {
        let mut cursor = Cursor::new(blob);
        let header = EctHeader::read(&mut cursor)?;
        info!("ECT: Version {}", header.version_str());

        // Every later read is bounded by the declared size.
        let total = cursor::count(header.total_size, 8)?;
        let blob = blob.get(..total).ok_or(EctError::TruncatedBuffer {
            offset: 0,
            len: total,
        })?;
        let mut cursor = Cursor::new(blob);
        cursor.take(HEADER_SIZE)?;

        let mut slots: [Option<Slot<'a>>; 8] = Default::default();
        for (precedence, entry) in Directory::new(cursor, &header)?.enumerate() {
            let entry = entry?;

            let Ok(registered) = registry::match_directory_name(entry.name) else {
                warn!("ECT: no decoder for block {}, skipping", entry.name);
                continue;
            };

            debug!("ECT: {} parsing at {:#x}", entry.name, entry.offset);
            let block = (registered.decode)(blob, entry.offset)
                .inspect_err(|e| error!("ECT: parse error {}: {e}", entry.name))?;

            let slot = &mut slots[registered.kind.index()];
            if let Some(previous) = slot {
                warn!(
                    "ECT: block {} at entry {precedence} replaces entry {}",
                    entry.name, previous.precedence
                );
            }
            *slot = Some(Slot { precedence, block });
        }

        info!("ECT: all parameter blocks decoded");
        Ok(Self {
            blob,
            phys_base: None,
            platform,
            header,
            slots,
        })
    }

    /// Decode `blob`, remembering the physical address it was loaded from.
    ///
    /// # Errors
    /// As for [`Ect::parse`].
    pub fn parse_at(blob: &'a [u8], phys_base: u64, platform: Platform) -> Result<Self, EctError> {
        let mut ect = Self::parse(blob, platform)?;
        ect.phys_base = Some(phys_base);
        Ok(ect)
    }

    /// Map the firmware's reserved region and decode it in place.
    ///
    /// # Errors
    /// [`EctError::TruncatedBuffer`] for an empty or unaddressable region,
    /// otherwise as for [`Ect::parse`].
    ///
    /// # Safety
    /// `map` must return a slice that stays mapped and unmodified for `'a`.
    pub unsafe fn from_region(
        map: &impl PhysMapRo,
        region: ReservedRegion,
        platform: Platform,
    ) -> Result<Self, EctError> {
        let len = usize::try_from(region.size).unwrap_or(0);
        if region.base == 0 || len < HEADER_SIZE {
            return Err(EctError::TruncatedBuffer {
                offset: 0,
                len: HEADER_SIZE,
            });
        }

        info!(
            "ECT: reserved region at {:#x}, size {:#x}",
            region.base, region.size
        );
        let blob = unsafe { map.map_ro(region.base, len) };
        Self::parse_at(blob, region.base, platform)
    }

    #[must_use]
    pub const fn header(&self) -> &EctHeader {
        &self.header
    }

    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Physical address the blob was loaded from, if known.
    #[must_use]
    pub const fn phys_base(&self) -> Option<u64> {
        self.phys_base
    }

    /// The blob, cut to the header's `total_size`.
    #[must_use]
    pub const fn blob(&self) -> &'a [u8] {
        self.blob
    }

    /// Decoded block of `kind`.
    #[must_use]
    pub fn block(&self, kind: BlockKind) -> Option<&Block<'a>> {
        self.slots[kind.index()].as_ref().map(|s| &s.block)
    }

    /// Directory position the block of `kind` was decoded from.
    #[must_use]
    pub fn precedence(&self, kind: BlockKind) -> Option<usize> {
        self.slots[kind.index()].as_ref().map(|s| s.precedence)
    }

    /// Decoded block registered under exactly `name`.
    #[must_use]
    pub fn get_block(&self, name: &str) -> Option<&Block<'a>> {
        registry::by_name(name).and_then(|e| self.block(e.kind))
    }

    /// Decoded blocks in directory order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block<'a>> {
        let mut ordered: [Option<&Slot<'a>>; 8] = Default::default();
        for (dst, src) in ordered.iter_mut().zip(&self.slots) {
            *dst = src.as_ref();
        }
        ordered.sort_unstable_by_key(|s| s.map_or(usize::MAX, |s| s.precedence));
        ordered.into_iter().flatten().map(|s| &s.block)
    }

    #[must_use]
    pub fn ap_thermal_block(&self) -> Option<&ApThermalBlock<'a>> {
        self.block(BlockKind::ApThermal).and_then(Block::as_ap_thermal)
    }

    #[must_use]
    pub fn asv_block(&self) -> Option<&AsvBlock<'a>> {
        self.block(BlockKind::Asv).and_then(Block::as_asv)
    }

    #[must_use]
    pub fn dvfs_block(&self) -> Option<&DvfsBlock<'a>> {
        self.block(BlockKind::Dvfs).and_then(Block::as_dvfs)
    }

    #[must_use]
    pub fn margin_block(&self) -> Option<&MarginBlock<'a>> {
        self.block(BlockKind::Margin).and_then(Block::as_margin)
    }

    #[must_use]
    pub fn pll_block(&self) -> Option<&PllBlock<'a>> {
        self.block(BlockKind::Pll).and_then(Block::as_pll)
    }

    #[must_use]
    pub fn minlock_block(&self) -> Option<&MinlockBlock<'a>> {
        self.block(BlockKind::Minlock).and_then(Block::as_minlock)
    }

    #[must_use]
    pub fn gen_param_block(&self) -> Option<&GenParamBlock<'a>> {
        self.block(BlockKind::GenParam).and_then(Block::as_gen_param)
    }

    #[must_use]
    pub fn new_timing_param_block(&self) -> Option<&NewTimingParamBlock<'a>> {
        self.block(BlockKind::NewTimingParam)
            .and_then(Block::as_new_timing_param)
    }

    /// DVFS domain `name`, renamed for this platform.
    #[must_use]
    pub fn dvfs_domain(&self, name: &str) -> Option<&DvfsDomain<'a>> {
        self.dvfs_block()?.domain(name, &self.platform)
    }

    /// PLL whose name contains, or is contained in, `name`.
    #[must_use]
    pub fn pll(&self, name: &str) -> Option<&Pll<'a>> {
        self.pll_block()?.pll(name)
    }

    /// ASV voltage domain `name`, renamed for this platform.
    #[must_use]
    pub fn asv_domain(&self, name: &str) -> Option<&VoltageDomain<'a>> {
        self.asv_block()?.domain(name, &self.platform)
    }

    #[must_use]
    pub fn ap_thermal_function(&self, name: &str) -> Option<&ApThermalFunction<'a>> {
        self.ap_thermal_block()?.function(name)
    }

    #[must_use]
    pub fn margin_domain(&self, name: &str) -> Option<&MarginDomain<'a>> {
        self.margin_block()?.domain(name)
    }

    #[must_use]
    pub fn minlock_domain(&self, name: &str) -> Option<&MinlockDomain<'a>> {
        self.minlock_block()?.domain(name)
    }

    #[must_use]
    pub fn gen_param_table(&self, name: &str) -> Option<&GenParamTable<'a>> {
        self.gen_param_block()?.table(name)
    }

    /// Timing entry whose 64-bit key equals `key`.
    #[must_use]
    pub fn new_timing_param(&self, key: u64) -> Option<&TimingParamSize<'a>> {
        self.new_timing_param_block()?.size(key)
    }
}
