//! Platform identity and the revision-aware domain rename.
//!
//! One blob serves two silicon revisions of the same `SoC`: entries meant for
//! the early revision carry a [`REVISION_SUFFIX`]. When the running platform
//! identifies as that revision, DVFS and ASV lookups append the suffix to the
//! caller's name before comparing.

/// Product id the `SoC` reports for the Exynos Auto V920.
pub const EXYNOS_AUTO_V920_SOC_ID: u32 = 0x0A92_0000;

/// Main revision whose domains are stored with [`REVISION_SUFFIX`].
pub const SUFFIXED_MAIN_REV: u32 = 0;

/// Suffix carried by revision-specific domain entries.
pub const REVISION_SUFFIX: &str = "_E0";

/// Queries of this length or longer never match a renamed lookup.
pub const MAX_DOMAIN_NAME_LEN: usize = 20;

/// Identity of the running `SoC`, as read from its chip-id block.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub soc_id: u32,
    pub main_rev: u32,
}

impl Platform {
    #[must_use]
    pub const fn new(soc_id: u32, main_rev: u32) -> Self {
        Self { soc_id, main_rev }
    }

    /// Whether domain names are looked up with [`REVISION_SUFFIX`] appended.
    #[must_use]
    pub const fn uses_revision_suffix(&self) -> bool {
        self.soc_id == EXYNOS_AUTO_V920_SOC_ID && self.main_rev == SUFFIXED_MAIN_REV
    }

    /// Compare a caller-supplied domain name against a stored one, applying
    /// the rename for this platform.
    #[must_use]
    pub fn matches(&self, query: &str, stored: &str) -> bool {
        if query.len() >= MAX_DOMAIN_NAME_LEN {
            return false;
        }
        if self.uses_revision_suffix() {
            stored.strip_suffix(REVISION_SUFFIX) == Some(query)
        } else {
            stored == query
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E0: Platform = Platform::new(EXYNOS_AUTO_V920_SOC_ID, 0);

    #[test]
    fn plain_platform_compares_verbatim() {
        let p = Platform::default();
        assert!(p.matches("MIF", "MIF"));
        assert!(!p.matches("MIF", "MIF_E0"));
        assert!(!p.matches("MI", "MIF"));
    }

    #[test]
    fn early_revision_appends_suffix() {
        assert!(E0.uses_revision_suffix());
        assert!(E0.matches("MIF", "MIF_E0"));
        assert!(!E0.matches("MIF", "MIF"));
        assert!(!E0.matches("MIF_E0", "MIF_E0"));
    }

    #[test]
    fn later_revision_is_not_renamed() {
        let p = Platform::new(EXYNOS_AUTO_V920_SOC_ID, 1);
        assert!(!p.uses_revision_suffix());
        assert!(p.matches("MIF", "MIF"));
    }

    #[test]
    fn overlong_queries_never_match() {
        let name = "A_VERY_LONG_DOMAIN_NM";
        assert!(name.len() >= MAX_DOMAIN_NAME_LEN);
        assert!(!Platform::default().matches(name, name));
    }
}
