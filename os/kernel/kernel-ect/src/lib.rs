//! # ECT (Exynos Characteristic Table) Support
//!
//! This crate decodes the characteristic table that Exynos boot firmware
//! leaves in a reserved memory region. The table describes the operating
//! points of the SoC: DVFS levels, ASV voltages, PLL coefficients, thermal
//! limits, voltage margins, min-lock pairs, and generic and memory-timing
//! parameter matrices. Drivers query it by domain name once the blob has
//! been decoded.
//!
//! ## Architecture
//!
//! ```text
//! Reserved region (little-endian blob)
//!     ↓
//! Header ("PARA", version, total_size, num_of_header)
//!     ↓
//! Directory (name, offset) × num_of_header
//!     ↓
//! Named blocks (THERMAL_AP, ASV, DVFS, MARGIN, PLL, MINLOCK, GEN, NEWTIMING)
//!     ↓
//! Records keyed by name (or by a 64-bit key for NEWTIMING)
//! ```
//!
//! ## Key Components
//!
//! ### Primitive readers ([`cursor`], [`array`])
//! * **Cursor**: bounds-checked little-endian reads over the blob
//! * **Padded strings**: `u32` length, bytes, NUL, padding to 4 bytes
//! * **Array views**: word arrays and packed records borrowed in place,
//!   readable regardless of alignment
//!
//! ### Directory ([`header`])
//! Signature check and the `(name, offset)` walk of the directory.
//!
//! ### Block decoders ([`blocks`])
//! One decoder per block kind, all sharing the two-stage
//! table-then-bodies layout. The block's parser version gates which fields
//! a record carries; the variations are expressed as enums.
//!
//! ### Registry ([`registry`])
//! Static table of block names and decoders. Directory names dispatch by
//! prefix, block lookups match exactly.
//!
//! ### Decoded table ([`Ect`])
//! Owns the decoded blocks and answers the lookup queries. Decoded data
//! borrows from the blob, so the blob must outlive the [`Ect`].
//!
//! ### Text dump (`dump` feature)
//! Human-readable rendering of the header and of every block, one node per
//! block plus an aggregate node.
//!
//! ## Usage Patterns
//!
//! ```rust,no_run
//! use kernel_ect::{Ect, Platform};
//!
//! # fn blob() -> &'static [u8] { &[] }
//! let ect = Ect::parse(blob(), Platform::default())?;
//! if let Some(cpu) = ect.dvfs_domain("dvfs_cpucl0") {
//!     log::info!("cpucl0 runs up to {} kHz", cpu.max_frequency);
//! }
//! if let Some(pll) = ect.pll("PLL_CPUCL0") {
//!     log::info!("{} has {} operating points", pll.name, pll.frequencies.len());
//! }
//! # Ok::<(), kernel_ect::EctError>(())
//! ```
//!
//! ## Safety Considerations
//!
//! The blob is firmware data and is treated as untrusted:
//! * **Bounds Checking**: every read is checked against the blob, and the
//!   blob is cut to the header's `total_size`
//! * **Overflow Checking**: offsets and `rows × cols` products use checked
//!   arithmetic
//! * **Fallible Allocation**: record lists are reserved with
//!   `try_reserve_exact`, so absurd counts fail instead of aborting
//! * **All or nothing**: a decode either succeeds completely or publishes
//!   nothing
//!
//! Only [`Ect::from_region`] is `unsafe`; it relies on the [`PhysMapRo`]
//! implementation to produce a valid mapping.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

extern crate alloc;

pub mod array;
pub mod blocks;
pub mod cursor;
#[cfg(feature = "dump")]
pub mod dump;
mod error;
pub mod header;
pub mod platform;
pub mod registry;
mod table;

pub use blocks::{
    ApThermalBlock, ApThermalFunction, ApThermalRange, AsvBlock, Block, BlockKind, BlockTable,
    DvfsBlock, DvfsClocks, DvfsDomain, DvfsLevel, GenParamBlock, GenParamTable, MarginBlock,
    MarginDomain, Margins, MinlockBlock, MinlockDomain, MinlockLevel, NewTimingParamBlock, Pll,
    PllBlock, PllFrequency, TimingMode, TimingParamSize, VOLTAGE_STEP_UV, VoltageDomain,
    VoltageTable, Voltages,
};
pub use error::EctError;
pub use header::EctHeader;
pub use platform::Platform;
pub use table::Ect;

/// Map a physical region and return a *read-only* byte slice for its contents.
/// You provide the implementation (identity map, HHDM offset, etc.).
pub trait PhysMapRo {
    /// # Safety
    /// The implementor must ensure the returned slice is valid for `len` bytes.
    unsafe fn map_ro<'a>(&self, paddr: u64, len: usize) -> &'a [u8];
}

/// The memory region firmware reserved for the table, as handed over at boot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReservedRegion {
    /// Physical base address.
    pub base: u64,
    /// Size in bytes.
    pub size: u64,
}

impl ReservedRegion {
    #[must_use]
    pub const fn new(base: u64, size: u64) -> Self {
        Self { base, size }
    }
}
